use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::RelayError;
use crate::llm::{CompletionGateway, Conversation, HistoryEntry, ModelRotor};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub model_used: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelsSnapshot {
    pub models: Vec<String>,
    pub current_model: String,
}

/// Inbound contract of the relay. Holds the process-wide rotor and, when a
/// credential is configured, the gateway that drives it.
pub struct RelayService {
    rotor: Arc<ModelRotor>,
    gateway: Option<CompletionGateway>,
}

impl RelayService {
    pub fn new(rotor: Arc<ModelRotor>, gateway: Option<CompletionGateway>) -> Self {
        Self { rotor, gateway }
    }

    pub fn submit_message(
        &self,
        message: &str,
        history: &[HistoryEntry],
        cancel: &CancellationToken,
    ) -> Result<ChatReply, RelayError> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or_else(|| RelayError::configuration("API_KEY not configured"))?;
        let conversation = Conversation::from_history(history, message);
        let result = gateway.complete(&conversation, cancel)?;
        Ok(ChatReply {
            response: result.text,
            model_used: result.model_used,
        })
    }

    pub fn ask(&self, message: &str, cancel: &CancellationToken) -> Result<ChatReply, RelayError> {
        self.submit_message(message, &[], cancel)
    }

    pub fn list_models(&self) -> ModelsSnapshot {
        ModelsSnapshot {
            models: self.rotor.models().to_vec(),
            current_model: self.rotor.current(),
        }
    }
}
