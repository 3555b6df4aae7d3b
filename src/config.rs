// ⚙️ Settings - environment driven, with defaults for local use

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `CREDIT_SERVER_ADDR`
    pub server_addr: SocketAddr,
    /// `RUST_LOG`
    pub log_filter: String,
    /// `CREDIT_LOG_JSON`
    pub log_json: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("CREDIT_SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = addr
            .parse()
            .with_context(|| format!("Invalid CREDIT_SERVER_ADDR: {}", addr))?;

        let log_filter = lookup("RUST_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_json = lookup("CREDIT_LOG_JSON")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Settings {
            server_addr,
            log_filter,
            log_json,
        })
    }
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_logging(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.server_addr, DEFAULT_SERVER_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.log_filter, "info");
        assert!(!settings.log_json);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("CREDIT_SERVER_ADDR", "127.0.0.1:8080"),
            ("RUST_LOG", "credit_request=debug"),
            ("CREDIT_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(settings.server_addr.port(), 8080);
        assert_eq!(settings.log_filter, "credit_request=debug");
        assert!(settings.log_json);
    }

    #[test]
    fn test_invalid_addr() {
        let err = Settings::from_lookup(lookup_from(&[("CREDIT_SERVER_ADDR", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("CREDIT_SERVER_ADDR"));
    }
}
