//! Error taxonomy for the users API and the layers above it.
//!
//! ERROR HANDLING
//! ==============
//! Errors are classified once, where the HTTP response is read, and then pass
//! through the cache layer untouched. `ApiError` is `Clone` because a single
//! deduplicated fetch fans its result out to every waiting reader.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Field-level validation messages reported by the server (or the local form).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    /// Messages keyed by wire field name (`email`, `password`, ...).
    pub fields: BTreeMap<String, Vec<String>>,
    /// Message that does not belong to a single field.
    pub message: Option<String>,
}

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// First message for `field`, which is what an inline form label shows.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|messages| messages.first()).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.message.is_none()
    }

    /// Extract validation details from a 4xx response body.
    ///
    /// Accepts `{"errors": {field: [msg]}}`, `{"errors": [{"field": f, "message": m}]}`
    /// (also `path`/`property` for the field name) and `{"message": "..." | [..]}`.
    /// Anything unrecognised becomes a form-level message mentioning `status`.
    #[must_use]
    pub fn from_payload(status: u16, payload: &Value) -> Self {
        let mut errors = Self::default();
        match payload.get("errors") {
            Some(Value::Object(map)) => {
                for (field, value) in map {
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                if let Some(text) = item.as_str() {
                                    errors.push(field.as_str(), text);
                                }
                            }
                        }
                        Value::String(text) => errors.push(field.as_str(), text.as_str()),
                        _ => {}
                    }
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    let field = ["field", "path", "property"]
                        .iter()
                        .find_map(|key| item.get(*key).and_then(Value::as_str));
                    let message = item.get("message").and_then(Value::as_str);
                    match (field, message) {
                        (Some(field), Some(message)) => errors.push(field, message),
                        (None, Some(message)) => errors.message = Some(message.to_owned()),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        match payload.get("message") {
            Some(Value::String(text)) if errors.message.is_none() => {
                errors.message = Some(text.clone());
            }
            Some(Value::Array(items)) if errors.message.is_none() => {
                let joined = items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join("; ");
                if !joined.is_empty() {
                    errors.message = Some(joined);
                }
            }
            _ => {}
        }
        if errors.is_empty() {
            errors.message = Some(format!("request rejected with status {status}"));
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        for (field, messages) in &self.fields {
            parts.push(format!("{field}: {}", messages.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

/// Error returned by every users API operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (network, DNS, CORS).
    #[error("transport error: {0}")]
    Transport(String),
    /// The addressed user does not exist (HTTP 404).
    #[error("not found: {path}")]
    NotFound { path: String },
    /// The server rejected the input (HTTP 4xx other than 404).
    #[error("validation failed ({status}): {errors}")]
    Validation { status: u16, errors: FieldErrors },
    /// The response body did not match the expected schema.
    #[error("unexpected response shape: {0}")]
    Decode(String),
    /// The server failed (HTTP 5xx).
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Field errors to show inline, when the server supplied any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Short message suitable for a banner or status line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the server. Check your connection.".to_owned(),
            Self::NotFound { .. } => "This user no longer exists.".to_owned(),
            Self::Validation { errors, .. } => errors
                .message
                .clone()
                .unwrap_or_else(|| "Please correct the highlighted fields.".to_owned()),
            Self::Decode(_) => "The server sent an unexpected response.".to_owned(),
            Self::Server { .. } => "The server failed to process the request.".to_owned(),
        }
    }
}

/// Error raised while loading client configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base URL must not be empty")]
    EmptyBaseUrl,
    #[error("base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
}
