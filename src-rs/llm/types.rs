use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One entry of caller-supplied history. Either key may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,
}

/// Prior turns plus the pending user message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    pub history: Vec<Message>,
    pub pending: String,
}

impl Conversation {
    pub fn new(pending: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            pending: pending.into(),
        }
    }

    /// Builds a conversation from inbound history entries. An entry holding
    /// both keys yields the user turn before the assistant turn.
    pub fn from_history(entries: &[HistoryEntry], pending: impl Into<String>) -> Self {
        let mut history = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            if let Some(user) = &entry.user {
                history.push(Message::user(user.clone()));
            }
            if let Some(assistant) = &entry.assistant {
                history.push(Message::assistant(assistant.clone()));
            }
        }
        Self {
            history,
            pending: pending.into(),
        }
    }

    /// History in order, followed by the pending message as a user turn.
    pub fn flatten(&self) -> Vec<Message> {
        let mut messages = self.history.clone();
        messages.push(Message::user(self.pending.clone()));
        messages
    }
}

/// Outbound payload for a single model attempt.
#[derive(Clone, Debug, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

#[derive(Clone, Debug)]
pub struct LLMResponse {
    pub content: String,
    pub raw: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub text: String,
    pub model_used: String,
}

/// A failed attempt against one model. Every code is retried the same way;
/// `code` only feeds the logs.
#[derive(Clone, Debug, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn network(message: &str) -> Self {
        Self::new("network_error", message)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::new("http_status", &format!("status {}: {}", status, body))
    }

    pub fn malformed(message: &str) -> Self {
        Self::new("malformed_response", message)
    }
}

pub trait ProviderAdapter: Send + Sync {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError>;
}
