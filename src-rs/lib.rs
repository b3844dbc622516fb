pub mod config;
pub mod error;
pub mod helpers;
pub mod service;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "api/lib.rs"]
pub mod api;

pub use config::RelayConfig;
pub use error::RelayError;
pub use service::{ChatReply, ModelsSnapshot, RelayService};
