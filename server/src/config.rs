//! Process configuration read once at startup.
//!
//! ERROR HANDLING
//! ==============
//! Invalid values are fatal: `main` logs the error and exits before binding,
//! rather than serving a page whose API calls would all fail.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use users::config::BASE_URL_ENV;
use users::{ApiConfig, ConfigError};

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid USERS_API_URL: {0}")]
    Api(#[from] ConfigError),
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
    #[error("leptos configuration: {0}")]
    Leptos(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub api: ApiConfig,
}

impl ServerConfig {
    /// Build from raw values; `None` selects the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is not a `u16` or the API URL is invalid.
    pub fn from_values(port: Option<&str>, api_url: Option<&str>) -> Result<Self, ServerError> {
        let port = match port.map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| ServerError::InvalidPort(raw.to_owned()))?,
        };
        Ok(Self {
            port,
            api: ApiConfig::from_value(api_url)?,
        })
    }

    /// Read `PORT` and `USERS_API_URL` from the environment.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_values`].
    pub fn from_env() -> Result<Self, ServerError> {
        let port = std::env::var("PORT").ok();
        let api_url = std::env::var(BASE_URL_ENV).ok();
        Self::from_values(port.as_deref(), api_url.as_deref())
    }
}
