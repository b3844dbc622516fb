use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    handle_ask, handle_chat, handle_health, handle_models, handle_sleep, handle_wake,
};
use crate::error::RelayError;
use crate::service::RelayService;

pub fn router(service: Arc<RelayService>) -> Router {
    Router::new()
        .route("/", get(handle_health))
        .route("/health", get(handle_health))
        .route("/models", get(handle_models))
        .route("/chat", post(handle_chat))
        .route("/ask/:message", get(handle_ask))
        .route("/sleep", get(handle_sleep))
        .route("/wake", get(handle_wake))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub struct RelayServer {
    pub port: u16,
    pub service: Arc<RelayService>,
}

impl RelayServer {
    pub fn new(port: u16, service: Arc<RelayService>) -> Self {
        Self { port, service }
    }

    pub async fn start(&self) -> Result<(), RelayError> {
        let app = router(self.service.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)?;
        tracing::info!(%addr, "model relay listening");
        axum::Server::from_tcp(listener)
            .map_err(|err| RelayError::Server(err.to_string()))?
            .serve(app.into_make_service())
            .await
            .map_err(|err| RelayError::Server(err.to_string()))
    }
}
