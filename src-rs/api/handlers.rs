use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::error::RelayError;
use crate::llm::HistoryEntry;
use crate::service::{ChatReply, ModelsSnapshot, RelayService};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            RelayError::Configuration(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            RelayError::AllModelsExhausted { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "All models failed to respond".to_string(),
            ),
            RelayError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "request cancelled".to_string()),
            RelayError::Io(_) | RelayError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "request failed");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "model relay is running"}))
}

pub async fn handle_models(State(service): State<Arc<RelayService>>) -> Json<ModelsSnapshot> {
    Json(service.list_models())
}

pub async fn handle_chat(
    State(service): State<Arc<RelayService>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, RelayError> {
    let reply = run_blocking(service, move |service, cancel| {
        service.submit_message(&req.message, &req.history, cancel)
    })
    .await?;
    Ok(Json(reply))
}

pub async fn handle_ask(
    State(service): State<Arc<RelayService>>,
    Path(message): Path<String>,
) -> Result<Json<ChatReply>, RelayError> {
    let reply = run_blocking(service, move |service, cancel| service.ask(&message, cancel)).await?;
    Ok(Json(reply))
}

pub async fn handle_sleep() -> Json<serde_json::Value> {
    Json(json!({"status": "App is now in sleep mode. Send a request to wake it up."}))
}

pub async fn handle_wake() -> Json<serde_json::Value> {
    Json(json!({"status": "App is now awake and ready to use!"}))
}

// Completion calls block on the provider, so they run on the blocking pool.
// If axum drops this future (client disconnect) the guard cancels the token
// and the gateway stops after its in-flight attempt.
async fn run_blocking<F>(service: Arc<RelayService>, work: F) -> Result<ChatReply, RelayError>
where
    F: FnOnce(&RelayService, &CancellationToken) -> Result<ChatReply, RelayError> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    tokio::task::spawn_blocking(move || work(&service, &cancel))
        .await
        .map_err(|err| RelayError::Server(err.to_string()))?
}
