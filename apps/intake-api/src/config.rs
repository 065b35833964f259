//! Intake API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::str::FromStr;

use intake_core::ValidationConfig;
use serde::{Deserialize, Serialize};

/// Name of the downstream queue accepted orders are pushed to.
pub const DEFAULT_ORDER_QUEUE: &str = "received-orders";

/// Intake API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Listen address
    pub bind_addr: String,

    /// HTTP port
    pub port: u16,

    /// Redis connection string (optional; unset means log-only publishing)
    pub redis_url: Option<String>,

    /// Redis list accepted orders are pushed to
    pub order_queue: String,

    /// Capacity of the hand-off channel between handlers and the forwarder
    pub publish_buffer: usize,

    /// Push attempts per order before it is dropped
    pub publish_max_attempts: u32,

    /// Request body cap in bytes
    pub max_body_bytes: usize,

    /// Email pattern override for the validator
    pub email_pattern: Option<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 7071,
            redis_url: None,
            order_queue: DEFAULT_ORDER_QUEUE.to_string(),
            publish_buffer: 1024,
            publish_max_attempts: 5,
            max_body_bytes: 1024 * 1024,
            email_pattern: None,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = IntakeConfig::default();

        let config = IntakeConfig {
            bind_addr: lookup("INTAKE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "INTAKE_PORT", defaults.port)?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            order_queue: lookup("ORDER_QUEUE_NAME").unwrap_or(defaults.order_queue),
            publish_buffer: parse_or(&lookup, "PUBLISH_BUFFER", defaults.publish_buffer)?,
            publish_max_attempts: parse_or(
                &lookup,
                "PUBLISH_MAX_ATTEMPTS",
                defaults.publish_max_attempts,
            )?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            email_pattern: lookup("ORDER_EMAIL_PATTERN"),
        };

        // tokio's mpsc panics on a zero capacity
        if config.publish_buffer == 0 {
            return Err(ConfigError::InvalidValue("PUBLISH_BUFFER".to_string()));
        }
        if config.publish_max_attempts == 0 {
            return Err(ConfigError::InvalidValue("PUBLISH_MAX_ATTEMPTS".to_string()));
        }
        if config.order_queue.trim().is_empty() {
            return Err(ConfigError::MissingRequired("ORDER_QUEUE_NAME".to_string()));
        }

        Ok(config)
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Validator settings derived from this configuration.
    pub fn validation(&self) -> ValidationConfig {
        match &self.email_pattern {
            Some(pattern) => ValidationConfig {
                email_pattern: pattern.clone(),
            },
            None => ValidationConfig::default(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<IntakeConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IntakeConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:7071");
        assert_eq!(config.order_queue, "received-orders");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.publish_buffer, 1024);
        assert_eq!(config.publish_max_attempts, 5);
        assert_eq!(config.validation(), ValidationConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("INTAKE_BIND_ADDR", "127.0.0.1"),
            ("INTAKE_PORT", "8080"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("ORDER_QUEUE_NAME", "orders-test"),
            ("PUBLISH_BUFFER", " 16 "),
            ("ORDER_EMAIL_PATTERN", "^.+@.+$"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.order_queue, "orders-test");
        assert_eq!(config.publish_buffer, 16);
        assert_eq!(config.validation().email_pattern, "^.+@.+$");
    }

    #[test]
    fn test_blank_redis_url_is_unset() {
        let config = load(&[("REDIS_URL", "  ")]).unwrap();
        assert_eq!(config.redis_url, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("INTAKE_PORT", "seventy")]),
            Err(ConfigError::InvalidValue(key)) if key == "INTAKE_PORT"
        ));
        assert!(matches!(
            load(&[("PUBLISH_BUFFER", "0")]),
            Err(ConfigError::InvalidValue(key)) if key == "PUBLISH_BUFFER"
        ));
        assert!(matches!(
            load(&[("PUBLISH_MAX_ATTEMPTS", "0")]),
            Err(ConfigError::InvalidValue(key)) if key == "PUBLISH_MAX_ATTEMPTS"
        ));
        assert!(matches!(
            load(&[("ORDER_QUEUE_NAME", "")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
