use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::types::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError};
use crate::error::RelayError;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenRouterConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenRouterAdapter {
    cfg: OpenRouterConfig,
    client: Client,
}

impl OpenRouterAdapter {
    pub fn new(mut cfg: OpenRouterConfig) -> Result<Self, RelayError> {
        if cfg.api_url.is_empty() {
            cfg.api_url = DEFAULT_API_URL.to_string();
        }
        if cfg.timeout.is_zero() {
            cfg.timeout = DEFAULT_TIMEOUT;
        }
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|err| RelayError::configuration(format!("http client: {}", err)))?;
        Ok(Self { cfg, client })
    }
}

impl ProviderAdapter for OpenRouterAdapter {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        send_request(&self.client, &self.cfg.api_url, &self.cfg.api_key, &request)
    }
}

fn send_request(
    client: &Client,
    api_url: &str,
    api_key: &str,
    request: &CompletionRequest,
) -> Result<LLMResponse, ProviderError> {
    let resp = client
        .post(api_url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .map_err(|err| ProviderError::network(&err.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .map_err(|err| ProviderError::network(&err.to_string()))?;
    if !status.is_success() {
        return Err(ProviderError::status(status.as_u16(), &body));
    }

    let raw: Value = serde_json::from_str(&body)
        .map_err(|_| ProviderError::malformed("invalid json"))?;
    let content = parse_response(&raw)
        .ok_or_else(|| ProviderError::malformed("missing choices[0].message.content"))?;
    Ok(LLMResponse {
        content,
        raw: Some(raw),
    })
}

fn parse_response(raw: &Value) -> Option<String> {
    raw.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}
