use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::rotation::ModelRotor;
use super::types::{CompletionRequest, CompletionResult, Conversation, ProviderAdapter};
use crate::error::RelayError;

pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Runs one completion against the rotor's current model, moving the rotor
/// forward on every failed attempt. At most one full cycle is attempted.
pub struct CompletionGateway {
    rotor: Arc<ModelRotor>,
    provider: Arc<dyn ProviderAdapter>,
    max_tokens: u32,
}

impl CompletionGateway {
    pub fn new(rotor: Arc<ModelRotor>, provider: Arc<dyn ProviderAdapter>, max_tokens: u32) -> Self {
        Self {
            rotor,
            provider,
            max_tokens,
        }
    }

    pub fn rotor(&self) -> &Arc<ModelRotor> {
        &self.rotor
    }

    pub fn complete(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult, RelayError> {
        let attempts = self.rotor.size();
        let messages = conversation.flatten();

        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                info!(attempt, "caller went away, abandoning completion");
                return Err(RelayError::Cancelled);
            }

            let model = self.rotor.current();
            info!(model = %model, attempt, max_attempts = attempts, "trying model");

            let request = CompletionRequest {
                model: model.clone(),
                messages: messages.clone(),
                max_tokens: self.max_tokens,
            };
            match self.provider.complete(request) {
                Ok(resp) => {
                    info!(model = %model, attempt, "model responded");
                    return Ok(CompletionResult {
                        text: resp.content,
                        model_used: model,
                    });
                }
                Err(err) => {
                    warn!(model = %model, code = %err.code, error = %err.message, "model attempt failed");
                    let next = self.rotor.advance();
                    warn!(from = %model, to = %next, "rotated to next model");
                }
            }
        }

        error!(attempts, "all models failed to respond");
        Err(RelayError::AllModelsExhausted { attempts })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::llm::types::{LLMResponse, Message, ProviderError};

    /// Replies with the scripted text for a model, fails for anything else,
    /// and records every request it sees.
    #[derive(Default)]
    pub(crate) struct ScriptedProvider {
        replies: HashMap<String, String>,
        pub(crate) seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub(crate) fn replying(model: &str, text: &str) -> Self {
            let mut provider = Self::default();
            provider.replies.insert(model.to_string(), text.to_string());
            provider
        }

        pub(crate) fn models_seen(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|req| req.model.clone())
                .collect()
        }
    }

    impl ProviderAdapter for ScriptedProvider {
        fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
            let reply = self.replies.get(&request.model).cloned();
            self.seen.lock().unwrap().push(request);
            match reply {
                Some(content) => Ok(LLMResponse { content, raw: None }),
                None => Err(ProviderError::network("operation timed out")),
            }
        }
    }

    fn gateway(models: &[&str], provider: Arc<ScriptedProvider>) -> CompletionGateway {
        let rotor = ModelRotor::new(models.iter().map(|m| m.to_string()).collect()).unwrap();
        CompletionGateway::new(Arc::new(rotor), provider, DEFAULT_MAX_TOKENS)
    }

    #[test]
    fn success_does_not_rotate() {
        let provider = Arc::new(ScriptedProvider::replying("A", "ok"));
        let gateway = gateway(&["A", "B", "C"], provider.clone());

        let before = gateway.rotor().current();
        let result = gateway
            .complete(&Conversation::new("hi"), &CancellationToken::new())
            .unwrap();

        assert_eq!(result.model_used, "A");
        assert_eq!(gateway.rotor().current(), before);
        assert_eq!(provider.models_seen(), vec!["A"]);
    }

    #[test]
    fn fails_over_to_next_model_and_keeps_it_current() {
        let provider = Arc::new(ScriptedProvider::replying("M2", "Hi there"));
        let gateway = gateway(&["M1", "M2"], provider.clone());

        let result = gateway
            .complete(&Conversation::new("hello"), &CancellationToken::new())
            .unwrap();

        assert_eq!(
            result,
            CompletionResult {
                text: "Hi there".to_string(),
                model_used: "M2".to_string(),
            }
        );
        assert_eq!(gateway.rotor().current(), "M2");
        assert_eq!(provider.models_seen(), vec!["M1", "M2"]);
    }

    #[test]
    fn attempts_are_bounded_by_model_count() {
        let provider = Arc::new(ScriptedProvider::default());
        let gateway = gateway(&["A", "B", "C"], provider.clone());

        let err = gateway
            .complete(&Conversation::new("hi"), &CancellationToken::new())
            .unwrap_err();

        assert!(matches!(err, RelayError::AllModelsExhausted { attempts: 3 }));
        assert_eq!(provider.models_seen(), vec!["A", "B", "C"]);
        // A full cycle leaves the cursor where it started.
        assert_eq!(gateway.rotor().current(), "A");
    }

    #[test]
    fn single_model_is_attempted_once() {
        let provider = Arc::new(ScriptedProvider::default());
        let gateway = gateway(&["solo"], provider.clone());

        for _ in 0..2 {
            let err = gateway
                .complete(&Conversation::new("hi"), &CancellationToken::new())
                .unwrap_err();
            assert!(matches!(err, RelayError::AllModelsExhausted { attempts: 1 }));
        }
        assert_eq!(provider.models_seen(), vec!["solo", "solo"]);
    }

    #[test]
    fn rotation_carries_over_between_requests() {
        let provider = Arc::new(ScriptedProvider::replying("B", "from b"));
        let gateway = gateway(&["A", "B"], provider.clone());

        gateway
            .complete(&Conversation::new("first"), &CancellationToken::new())
            .unwrap();
        let second = gateway
            .complete(&Conversation::new("second"), &CancellationToken::new())
            .unwrap();

        assert_eq!(second.model_used, "B");
        assert_eq!(provider.models_seen(), vec!["A", "B", "B"]);
    }

    #[test]
    fn sends_flattened_conversation_and_token_limit() {
        let provider = Arc::new(ScriptedProvider::replying("A", "fine"));
        let gateway = gateway(&["A"], provider.clone());
        let conversation = Conversation {
            history: vec![Message::user("hi"), Message::assistant("hello")],
            pending: "how are you".to_string(),
        };

        gateway
            .complete(&conversation, &CancellationToken::new())
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, 1024);
        assert_eq!(
            seen[0].messages,
            vec![
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("how are you"),
            ]
        );
    }

    #[test]
    fn cancelled_token_stops_before_first_attempt() {
        let provider = Arc::new(ScriptedProvider::replying("A", "unused"));
        let gateway = gateway(&["A", "B"], provider.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = gateway
            .complete(&Conversation::new("hi"), &cancel)
            .unwrap_err();

        assert!(matches!(err, RelayError::Cancelled));
        assert!(provider.models_seen().is_empty());
        assert_eq!(gateway.rotor().current(), "A");
    }
}
