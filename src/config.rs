//! API client configuration
//!
//! Holds the base URL, API key and per-request timeout used by
//! [`ApiClient`](crate::ApiClient). Values can be given directly or read
//! from the environment.

use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Public TMDB v3 endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "TMDB_API_KEY";
/// Environment variable overriding the base URL
pub const BASE_URL_VAR: &str = "TMDB_BASE_URL";
/// Environment variable overriding the timeout, in whole seconds
pub const TIMEOUT_VAR: &str = "TMDB_TIMEOUT_SECS";

/// Errors that can occur while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key was provided
    #[error("No API key configured (set TMDB_API_KEY)")]
    MissingApiKey,

    /// The timeout is not a positive number of seconds
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Connection settings for the metadata API
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to
    pub base_url: String,
    /// Key sent as the `api_key` query parameter
    pub api_key: String,
    /// Timeout applied to each request
    pub timeout: Duration,
}

impl ApiConfig {
    /// Creates a configuration for the public endpoint with the default timeout.
    ///
    /// Fails if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replaces the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the configuration from `TMDB_API_KEY`, `TMDB_BASE_URL` and
    /// `TMDB_TIMEOUT_SECS`. Only the key is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(API_KEY_VAR).unwrap_or_default())?;

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config = config.with_timeout(parse_timeout_secs(&raw)?);
        }

        Ok(config)
    }
}

/// Parses a timeout given in whole seconds; zero is rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

// Keeps the key out of logs and panic messages
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
