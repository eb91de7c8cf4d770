//! User resource DTOs shared by the browser client, the CLI and tests.
//!
//! DESIGN
//! ======
//! Wire names are camelCase to match the REST API. Write payloads skip absent
//! optional fields entirely so a partial update never sends `null` for a key
//! the caller did not touch. Read payloads are checked once at the boundary
//! (`User::check`) so rendering code can trust what it receives.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;

/// Minimum password length accepted by the users API.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A user record as returned by `GET /users` and `GET /users/:id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique email address.
    pub email: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Creation timestamp (ISO-8601).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last modification timestamp (ISO-8601), never before `created_at`.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Reject records that parse but break the resource contract.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] for an empty id or email, or when
    /// `updatedAt` precedes `createdAt`.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.id.trim().is_empty() {
            return Err(ApiError::Decode("user record has an empty id".to_owned()));
        }
        if self.email.trim().is_empty() {
            return Err(ApiError::Decode(format!("user {} has an empty email", self.id)));
        }
        if self.updated_at < self.created_at {
            return Err(ApiError::Decode(format!(
                "user {} was updated before it was created",
                self.id
            )));
        }
        Ok(())
    }
}

/// Body of `POST /users`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    pub password: String,
}

/// Body of `PUT /users/:id`.
///
/// `None` means "leave unchanged" and is never serialized. `Some(String::new())`
/// is sent as `""` and clears the field on the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserInput {
    /// True when no field is set, i.e. the request would be a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.about.is_none() && self.password.is_none()
    }
}

/// Collection envelope returned by `GET /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
}
