use std::sync::Arc;

use model_relay_rs::api::server::RelayServer;
use model_relay_rs::helpers::{build_relay_service, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config()?;
    tracing::info!(models = cfg.models.len(), api_url = %cfg.api_url, "loaded relay config");

    // The blocking HTTP client is built outside the async runtime.
    let service = Arc::new(build_relay_service(&cfg)?);
    let server = RelayServer::new(cfg.port, service);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.start())?;
    Ok(())
}
