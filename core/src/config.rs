//! Client configuration read from the environment at startup.

use std::time::Duration;

use crate::error::ConfigError;

pub const BACKEND_URL_VAR: &str = "EDUMANAGE_BACKEND_URL";
pub const TIMEOUT_VAR: &str = "EDUMANAGE_API_TIMEOUT_MS";

const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Where the backend lives and how long a single call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub api_prefix: String,
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(backend_url: &str) -> Self {
        Self {
            backend_url: backend_url.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup(BACKEND_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing(BACKEND_URL_VAR.to_string()))?;

        let mut config = Self::new(backend_url.trim());
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.timeout_ms = match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: TIMEOUT_VAR.to_string(),
                        value: raw,
                    })
                }
            };
        }
        Ok(config)
    }

    /// Base address every endpoint path is appended to.
    pub fn base_address(&self) -> String {
        format!("{}{}", self.backend_url.trim_end_matches('/'), self.api_prefix)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
