use std::io;

use crate::client::{ClientError, HTTPClient};
use crate::models::{ChatMessage, ChatRequest, CLIConfig, HistoryEntry, Role};
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
    pub history: Vec<ChatMessage>,
    pub current_model: Option<String>,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self {
            config,
            client,
            history: Vec::new(),
            current_model: None,
        }
    }

    pub fn run(&mut self) {
        self.refresh_model();
        render::banner(&self.config, self.current_model.as_deref());
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.send(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "models" => {
                if let Some(models) = self.refresh_model() {
                    render::models(&models, self.current_model.as_deref());
                }
            }
            "history" => render::history(&self.history),
            "reset" => {
                self.history.clear();
                render::info("history cleared");
            }
            "config" => render::config(&self.config, self.current_model.as_deref()),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    match self.client.with_base(rest) {
                        Ok(client) => {
                            self.client = client;
                            self.config.base_url = rest.to_string();
                            render::info("base url updated");
                        }
                        Err(err) => render::error(&err),
                    }
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn send(&mut self, line: &str) {
        let req = ChatRequest {
            message: line.to_string(),
            history: history_entries(&self.history),
        };

        match self.client.chat(&req) {
            Ok(resp) => {
                self.history.push(ChatMessage {
                    role: Role::User,
                    content: line.to_string(),
                });
                self.history.push(ChatMessage {
                    role: Role::Assistant,
                    content: resp.response.clone(),
                });
                render::response(&resp);
                self.current_model = Some(resp.model_used);
            }
            Err(ClientError::Timeout) => {
                render::error("request timed out, the relay may be cycling through models. Try again.")
            }
            Err(ClientError::Other(err)) => render::error(&err),
        }
    }

    fn refresh_model(&mut self) -> Option<Vec<String>> {
        match self.client.models() {
            Ok(resp) => {
                self.current_model = Some(resp.current_model);
                Some(resp.models)
            }
            Err(ClientError::Timeout) => {
                render::error("timed out fetching models");
                None
            }
            Err(ClientError::Other(err)) => {
                render::error(&format!("could not fetch models: {}", err));
                None
            }
        }
    }
}

/// One history entry per prior message, keyed by its role.
fn history_entries(messages: &[ChatMessage]) -> Vec<HistoryEntry> {
    messages
        .iter()
        .map(|msg| match msg.role {
            Role::User => HistoryEntry {
                user: Some(msg.content.clone()),
                assistant: None,
            },
            Role::Assistant => HistoryEntry {
                user: None,
                assistant: Some(msg.content.clone()),
            },
        })
        .collect()
}
