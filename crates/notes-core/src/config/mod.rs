//! Client configuration.
//!
//! Resolved once when a controller is constructed. Values come from the
//! environment through a lookup function so tests can supply a map instead.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::util::{is_http_url, normalize_text_option};

pub const API_URL_VAR: &str = "NOTES_API_URL";
pub const TIMEOUT_VAR: &str = "NOTES_API_TIMEOUT_SECS";
pub const DELETE_STRATEGY_VAR: &str = "NOTES_DELETE_STRATEGY";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How `delete_by_user` removes a user's notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteStrategy {
    /// Fetch the user's notes, then delete them one by one. Not atomic.
    #[default]
    PerNote,
    /// One `DELETE /notes/{userId}` request.
    Bulk,
}

impl DeleteStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerNote => "per-note",
            Self::Bulk => "bulk",
        }
    }
}

impl fmt::Display for DeleteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeleteStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-note" | "per_note" | "pernote" => Ok(Self::PerNote),
            "bulk" => Ok(Self::Bulk),
            other => Err(ConfigError::Invalid(format!(
                "{DELETE_STRATEGY_VAR} must be 'per-note' or 'bulk', got '{other}'"
            ))),
        }
    }
}

/// Settings for talking to the remote note service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub delete_strategy: DeleteStrategy,
}

impl ClientConfig {
    /// Config for an explicit base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url.into())?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delete_strategy: DeleteStrategy::default(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    /// Resolve config with an optional base URL taking precedence over
    /// `NOTES_API_URL`.
    pub fn from_env_with_override(base_url: Option<String>) -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        let base_url = normalize_text_option(base_url);
        Self::from_lookup(|name| {
            if name == API_URL_VAR {
                if let Some(url) = &base_url {
                    return Some(url.clone());
                }
            }
            values.get(name).cloned()
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = normalize_text_option(lookup(API_URL_VAR))
            .ok_or(ConfigError::MissingVar(API_URL_VAR))?;
        let base_url = normalize_base_url(base_url)?;

        let timeout_secs = match normalize_text_option(lookup(TIMEOUT_VAR)) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("{TIMEOUT_VAR} must be an integer in [1, 300]"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if !(1..=300).contains(&timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "{TIMEOUT_VAR} must be in [1, 300]"
            )));
        }

        let delete_strategy = normalize_text_option(lookup(DELETE_STRATEGY_VAR))
            .map(|raw| raw.parse::<DeleteStrategy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            delete_strategy,
        })
    }

    #[must_use]
    pub const fn with_delete_strategy(mut self, strategy: DeleteStrategy) -> Self {
        self.delete_strategy = strategy;
        self
    }
}

fn normalize_base_url(raw: String) -> Result<String, ConfigError> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(ConfigError::MissingVar(API_URL_VAR));
    }
    if !is_http_url(&base) {
        return Err(ConfigError::Invalid(format!(
            "{API_URL_VAR} must start with http:// or https://"
        )));
    }
    Ok(base)
}
