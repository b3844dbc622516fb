pub use crate::config::RelayConfig;
pub use crate::error::RelayError;
pub use crate::llm::{CompletionGateway, HistoryEntry, ModelRotor, OpenRouterAdapter, OpenRouterConfig};
pub use crate::service::{ChatReply, ModelsSnapshot, RelayService};

pub mod handlers;
pub mod server;
