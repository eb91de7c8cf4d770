//! Resource API for `/users`: five operations, one HTTP round trip each.
//!
//! ERROR HANDLING
//! ==============
//! Status codes are classified here and nowhere else:
//! 2xx success, 404 `NotFound`, other 4xx `Validation`, 5xx `Server`.
//! Bodies are decoded into typed schemas and checked, so a malformed payload
//! surfaces as `Decode` at this boundary. There is no retry.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, FieldErrors};
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::model::{CreateUserInput, ListEnvelope, UpdateUserInput, User};

/// Collection path for the users resource.
pub const USERS_PATH: &str = "/users";

/// Longest server error text carried into `ApiError::Server`.
const MAX_SERVER_MESSAGE_CHARS: usize = 200;

/// Path of a single user, with the id percent-encoded.
#[must_use]
pub fn user_path(id: &str) -> String {
    format!("{USERS_PATH}/{}", urlencoding::encode(id))
}

/// Typed client for the users REST resource.
pub struct UserApi<T> {
    transport: T,
}

impl<T: Transport> UserApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /users`, unwrapping the `{ data: [...] }` envelope.
    ///
    /// # Errors
    ///
    /// `Transport`, `Server`, or `Decode` when the envelope or a record is malformed.
    pub async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let response = self.send(HttpRequest::new(Method::Get, USERS_PATH)).await?;
        let envelope: ListEnvelope<User> = decode(USERS_PATH, &response)?;
        for user in &envelope.data {
            user.check()?;
        }
        Ok(envelope.data)
    }

    /// `GET /users/:id`.
    ///
    /// # Errors
    ///
    /// `NotFound` on 404, otherwise as [`Self::list_all`].
    pub async fn get_by_id(&self, id: &str) -> Result<User, ApiError> {
        let path = user_path(id);
        let response = self.send(HttpRequest::new(Method::Get, path.clone())).await?;
        decode_user(&path, &response)
    }

    /// `POST /users`.
    ///
    /// # Errors
    ///
    /// `Validation` when the server rejects the input (duplicate email, short password).
    pub async fn create(&self, input: &CreateUserInput) -> Result<User, ApiError> {
        let body = encode(input)?;
        let response = self
            .send(HttpRequest::new(Method::Post, USERS_PATH).with_body(body))
            .await?;
        decode_user(USERS_PATH, &response)
    }

    /// `PUT /users/:id` carrying only the fields set on `input`.
    ///
    /// # Errors
    ///
    /// `NotFound` on 404, `Validation` when the server rejects the input.
    pub async fn update(&self, id: &str, input: &UpdateUserInput) -> Result<User, ApiError> {
        let path = user_path(id);
        let body = encode(input)?;
        let response = self
            .send(HttpRequest::new(Method::Put, path.clone()).with_body(body))
            .await?;
        decode_user(&path, &response)
    }

    /// `DELETE /users/:id`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not exist (including a repeated delete).
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        let path = user_path(id);
        self.send(HttpRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        tracing::debug!(method, %path, "users api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(method, %path, %error, "users api request failed");
                return Err(error);
            }
        };
        let status = response.status;
        let classified = classify(&path, response);
        match &classified {
            Ok(_) => tracing::debug!(method, %path, status, "users api response"),
            Err(error) => tracing::warn!(method, %path, status, %error, "users api error response"),
        }
        classified
    }
}

fn classify(path: &str, response: HttpResponse) -> Result<HttpResponse, ApiError> {
    let status = response.status;
    match status {
        200..=299 => Ok(response),
        404 => Err(ApiError::NotFound { path: path.to_owned() }),
        400..=499 => {
            let payload = serde_json::from_str::<Value>(&response.body).unwrap_or(Value::Null);
            Err(ApiError::Validation {
                status,
                errors: FieldErrors::from_payload(status, &payload),
            })
        }
        _ => Err(ApiError::Server {
            status,
            message: server_message(&response.body),
        }),
    }
}

fn server_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    });
    let text = from_json.unwrap_or_else(|| body.trim().to_owned());
    if text.is_empty() {
        return "no response body".to_owned();
    }
    text.chars().take(MAX_SERVER_MESSAGE_CHARS).collect()
}

fn encode<S: serde::Serialize>(input: &S) -> Result<Value, ApiError> {
    serde_json::to_value(input).map_err(|error| ApiError::Decode(format!("request body: {error}")))
}

fn decode<D: DeserializeOwned>(path: &str, response: &HttpResponse) -> Result<D, ApiError> {
    serde_json::from_str(&response.body).map_err(|error| ApiError::Decode(format!("{path}: {error}")))
}

fn decode_user(path: &str, response: &HttpResponse) -> Result<User, ApiError> {
    let user: User = decode(path, response)?;
    user.check()?;
    Ok(user)
}
