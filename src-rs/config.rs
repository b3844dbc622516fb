use std::time::Duration;

use crate::llm::{DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT};

pub const DEFAULT_MODELS: [&str; 6] = [
    "meta-llama/llama-3.3-70b-instruct",
    "meta-llama/llama-3.3-8b-instruct",
    "qwen/qwen2.5-72b-instruct",
    "qwen/qwen2.5-32b-instruct",
    "mistralai/mistral-7b-instruct-v0.2",
    "google/gemma-2-9b-it",
];

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Bearer credential for the completion endpoint. Introspection works
    /// without it; completions do not.
    pub api_key: Option<String>,
    pub api_url: String,
    /// Rotation order, first entry is the initial current model.
    pub models: Vec<String>,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_TIMEOUT,
            port: DEFAULT_PORT,
        }
    }
}
