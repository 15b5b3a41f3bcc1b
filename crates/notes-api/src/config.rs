use std::collections::HashMap;
use std::env;

use http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Single origin allowed by CORS; any origin when unset
    pub allowed_origin: Option<HeaderValue>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "NOTES_API_BIND_ADDR", "127.0.0.1:8000");

        let allowed_origin = optional_trimmed(&lookup, "NOTES_API_ALLOWED_ORIGIN")
            .map(|origin| {
                if !is_http_url(&origin) {
                    return Err(ConfigError::Invalid(
                        "NOTES_API_ALLOWED_ORIGIN must start with http:// or https://".to_string(),
                    ));
                }
                HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|_| {
                    ConfigError::Invalid(
                        "NOTES_API_ALLOWED_ORIGIN is not a valid header value".to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            bind_addr,
            allowed_origin,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
