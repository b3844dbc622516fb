use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::llm::{CompletionGateway, ModelRotor, OpenRouterAdapter, OpenRouterConfig};
use crate::service::RelayService;

pub fn load_config() -> Result<RelayConfig, RelayError> {
    config_from_lookup(|key| env::var(key).ok())
}

/// Builds a config from any key lookup; unset or blank values keep defaults.
pub fn config_from_lookup<F>(lookup: F) -> Result<RelayConfig, RelayError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    let mut cfg = RelayConfig::default();

    cfg.api_key = get("API_KEY");
    if let Some(url) = get("API_URL") {
        cfg.api_url = url;
    }
    if let Some(raw) = get("RELAY_MODELS") {
        cfg.models = parse_model_list(&raw)?;
    }
    if let Some(max_tokens) = parse_var::<u32>("MAX_TOKENS", get("MAX_TOKENS"))? {
        cfg.max_tokens = max_tokens;
    }
    if let Some(secs) = parse_var::<u64>("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"))? {
        if secs == 0 {
            return Err(RelayError::configuration("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }
        cfg.request_timeout = Duration::from_secs(secs);
    }
    let port = match get("PORT") {
        Some(raw) => Some(raw),
        None => get("BACKEND_PORT"),
    };
    if let Some(port) = parse_var::<u16>("PORT", port)? {
        cfg.port = port;
    }

    Ok(cfg)
}

/// Splits a comma separated model list, dropping blanks and repeats while
/// keeping first-seen order.
pub fn parse_model_list(raw: &str) -> Result<Vec<String>, RelayError> {
    let mut models: Vec<String> = Vec::new();
    for item in raw.split(',') {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !models.iter().any(|m| m == trimmed) {
            models.push(trimmed.to_string());
        }
    }
    if models.is_empty() {
        return Err(RelayError::configuration("RELAY_MODELS contains no model identifiers"));
    }
    Ok(models)
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>, RelayError> {
    match raw {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| RelayError::configuration(format!("invalid value for {}: {:?}", name, value))),
        None => Ok(None),
    }
}

/// Wires rotor, provider and gateway together. A missing credential leaves
/// the service without a gateway rather than failing startup.
pub fn build_relay_service(cfg: &RelayConfig) -> Result<RelayService, RelayError> {
    let rotor = Arc::new(ModelRotor::new(cfg.models.clone())?);
    let gateway = match &cfg.api_key {
        Some(api_key) => {
            let adapter = OpenRouterAdapter::new(OpenRouterConfig {
                api_key: api_key.clone(),
                api_url: cfg.api_url.clone(),
                timeout: cfg.request_timeout,
            })?;
            Some(CompletionGateway::new(rotor.clone(), Arc::new(adapter), cfg.max_tokens))
        }
        None => {
            tracing::warn!("API_KEY not set, chat requests will be rejected");
            None
        }
    };
    Ok(RelayService::new(rotor, gateway))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use crate::config::DEFAULT_MODELS;

    fn config_from(pairs: &[(&str, &str)]) -> Result<RelayConfig, RelayError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.api_url, "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(cfg.models, DEFAULT_MODELS.to_vec());
        assert_eq!(cfg.max_tokens, 1024);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.port, 8000);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config_from(&[
            ("API_KEY", " sk-test "),
            ("API_URL", "http://localhost:9000/v1/chat/completions"),
            ("RELAY_MODELS", "a, b"),
            ("MAX_TOKENS", "256"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("BACKEND_PORT", "9100"),
        ])
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.api_url, "http://localhost:9000/v1/chat/completions");
        assert_eq!(cfg.models, vec!["a", "b"]);
        assert_eq!(cfg.max_tokens, 256);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.port, 9100);
    }

    #[test]
    fn port_wins_over_backend_port() {
        let cfg = config_from(&[("PORT", "7000"), ("BACKEND_PORT", "9100")]).unwrap();
        assert_eq!(cfg.port, 7000);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = config_from(&[("API_KEY", "   ")]).unwrap();
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn rejects_bad_numbers_and_zero_timeout() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(RelayError::Configuration(_))
        ));
        assert!(matches!(
            config_from(&[("REQUEST_TIMEOUT_SECS", "0")]),
            Err(RelayError::Configuration(_))
        ));
    }

    #[test]
    fn model_list_trims_and_dedups_preserving_order() {
        let got = parse_model_list(" b , a ,, b ,c,").unwrap();
        assert_eq!(got, vec!["b", "a", "c"]);
    }

    #[test]
    fn model_list_without_entries_is_rejected() {
        assert!(matches!(parse_model_list(" , ,"), Err(RelayError::Configuration(_))));
    }

    #[test]
    fn service_without_key_still_lists_models() {
        let cfg = RelayConfig {
            models: vec!["x".to_string(), "y".to_string()],
            ..RelayConfig::default()
        };
        let service = build_relay_service(&cfg).unwrap();
        let snapshot = service.list_models();
        assert_eq!(snapshot.models, vec!["x", "y"]);
        assert_eq!(snapshot.current_model, "x");
    }
}
