pub mod gateway;
pub mod openrouter_adapter;
pub mod rotation;
pub mod types;

pub use gateway::{CompletionGateway, DEFAULT_MAX_TOKENS};
pub use openrouter_adapter::{OpenRouterAdapter, OpenRouterConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use rotation::ModelRotor;
pub use types::{
    CompletionRequest, CompletionResult, Conversation, HistoryEntry, LLMResponse, Message, ProviderAdapter,
    ProviderError, Role,
};
