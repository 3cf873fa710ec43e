use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_SEARCH_API_URL: &str = "https://api.x.com/2/tweets/search/recent";
pub const DEFAULT_COMPLETION_API_URL: &str = "https://api.x.ai/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "grok-beta";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Bearer token for the post search API. Checked when the search runs, not at startup.
    pub search_api_token: Option<String>,
    /// Bearer token for the completion API. Checked per headline.
    pub completion_api_key: Option<String>,
    pub search_api_url: String,
    pub completion_api_url: String,
    pub completion_model: String,
    pub cache_ttl: Duration,
    pub match_timeout: Duration,
    pub match_concurrency: usize,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let secret = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            search_api_token: secret("SEARCH_API_TOKEN"),
            completion_api_key: secret("COMPLETION_API_KEY"),
            search_api_url: lookup("SEARCH_API_URL").unwrap_or_else(|| DEFAULT_SEARCH_API_URL.to_string()),
            completion_api_url: lookup("COMPLETION_API_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_API_URL.to_string()),
            completion_model: lookup("COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            cache_ttl: Duration::from_secs(parse_number(&lookup, "CACHE_TTL_SECS", 600)?),
            match_timeout: Duration::from_secs(parse_number(&lookup, "MATCH_TIMEOUT_SECS", 30)?),
            match_concurrency: parse_number::<usize, _>(&lookup, "MATCH_CONCURRENCY", 8)?.max(1),
            http_timeout: Duration::from_secs(parse_number(&lookup, "HTTP_TIMEOUT_SECS", 30)?),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_number<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).expect("defaults should load");
        assert_eq!(config.server_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.match_concurrency, 8);
        assert_eq!(config.search_api_url, DEFAULT_SEARCH_API_URL);
        assert!(config.search_api_token.is_none());
        assert!(config.completion_api_key.is_none());
    }

    #[test]
    fn blank_secrets_count_as_missing() {
        let config = config_from(&[("SEARCH_API_TOKEN", "  "), ("COMPLETION_API_KEY", "xai-123")])
            .expect("config should load");
        assert!(config.search_api_token.is_none());
        assert_eq!(config.completion_api_key.as_deref(), Some("xai-123"));
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.starts_with("Invalid port")));
    }

    #[test]
    fn zero_concurrency_is_clamped_to_one() {
        let config = config_from(&[("MATCH_CONCURRENCY", "0")]).expect("config should load");
        assert_eq!(config.match_concurrency, 1);
    }

    #[test]
    fn invalid_ttl_names_the_variable() {
        let err = config_from(&[("CACHE_TTL_SECS", "ten")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("CACHE_TTL_SECS")));
    }
}
