use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::models::{ChatRequest, ChatResponse, ErrorBody, ModelsResponse};

pub enum ClientError {
    Timeout,
    Other(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Other(err.to_string())
        }
    }
}

pub struct HTTPClient {
    pub base_url: String,
    timeout_secs: u64,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn with_base(&self, base_url: &str) -> Result<Self, String> {
        Self::new(base_url, self.timeout_secs)
    }

    pub fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let url = format!("{}/chat", self.base_url);
        let resp = self.client.post(url).json(req).send()?;
        decode(resp)
    }

    pub fn models(&self) -> Result<ModelsResponse, ClientError> {
        let url = format!("{}/models", self.base_url);
        let resp = self.client.get(url).send()?;
        decode(resp)
    }
}

fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().map_err(ClientError::from);
    }
    let body = resp.text().unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|err| err.detail)
        .unwrap_or(body);
    Err(ClientError::Other(format!("http {}: {}", status.as_u16(), detail)))
}
