use std::io::{self, Write};

use crate::models::{ChatMessage, ChatResponse, CLIConfig, Role};

pub fn banner(cfg: &CLIConfig, current_model: Option<&str>) {
    println!("Model Relay Chat");
    println!("Relay: {}", cfg.base_url);
    println!("Current model: {}", current_model.unwrap_or("unknown"));
    println!("Type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                 Show commands");
    println!("  /exit | /quit         Exit");
    println!("  /models               Refresh the current model");
    println!("  /history              Show chat history");
    println!("  /reset                Clear chat history");
    println!("  /config               Show current config");
    println!("  /base <url>           Update relay URL");
}

pub fn response(resp: &ChatResponse) {
    println!("assistant> {}", resp.response);
    println!("  (model: {})", resp.model_used);
}

pub fn models(models: &[String], current_model: Option<&str>) {
    for model in models {
        let marker = if Some(model.as_str()) == current_model { "*" } else { " " };
        println!(" {} {}", marker, model);
    }
}

pub fn config(cfg: &CLIConfig, current_model: Option<&str>) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  timeout: {}s", cfg.timeout_secs);
    println!("  model: {}", current_model.unwrap_or("unknown"));
}

pub fn history(items: &[ChatMessage]) {
    if items.is_empty() {
        println!("no history");
        return;
    }
    for item in items {
        let role = match item.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        println!("{}> {}", role, item.content);
    }
}

pub fn info(message: &str) {
    println!("{}", message);
}

pub fn error(message: &str) {
    eprintln!("error: {}", message);
}
