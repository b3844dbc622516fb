use thiserror::Error;

/// Failures that cross the relay's service boundary.
///
/// Individual model attempts never surface here; they are absorbed by the
/// gateway loop as [`crate::llm::ProviderError`] values.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("all models failed to respond after {attempts} attempt(s)")]
    AllModelsExhausted { attempts: usize },

    #[error("request cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

impl RelayError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
