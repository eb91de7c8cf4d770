//! API base URL configuration.
//!
//! The browser bundle reads `USERS_API_URL` at build time (`option_env!`), the
//! CLI and server at runtime. Both funnel through [`ApiConfig::parse`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::ConfigError;

/// Environment variable naming the users API base URL.
pub const BASE_URL_ENV: &str = "USERS_API_URL";

/// Base URL used when `USERS_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Absolute `http(s)` URL without a trailing slash.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl ApiConfig {
    /// Validate and normalize a base URL.
    ///
    /// # Errors
    ///
    /// `EmptyBaseUrl` for blank input, `InvalidBaseUrl` when the scheme is not
    /// `http` or `https` or nothing follows it.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"));
        match host {
            Some(host) if !host.is_empty() => Ok(Self {
                base_url: trimmed.to_owned(),
            }),
            _ => Err(ConfigError::InvalidBaseUrl(raw.trim().to_owned())),
        }
    }

    /// Parse an optional value, falling back to [`DEFAULT_BASE_URL`] when unset.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::parse`].
    pub fn from_value(value: Option<&str>) -> Result<Self, ConfigError> {
        value.map_or_else(|| Ok(Self::default()), Self::parse)
    }

    /// Read `USERS_API_URL` from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::parse`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = std::env::var(BASE_URL_ENV).ok();
        Self::from_value(value.as_deref())
    }
}
