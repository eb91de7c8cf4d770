//! Browser HTTP transport for the users API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): a stub that fails with `ApiError::Transport`; the users
//! page only loads data after hydration, so SSR renders the loading state.
//!
//! ERROR HANDLING
//! ==============
//! Only failures to obtain a response are reported here. Status codes and
//! bodies are passed through untouched for `users::api` to classify.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use async_trait::async_trait;
use users::{ApiConfig, ApiError, HttpRequest, HttpResponse, Transport};

/// Base URL baked in at build time from `USERS_API_URL`, else the default.
fn resolve_base_url(raw: Option<&str>) -> String {
    match ApiConfig::from_value(raw) {
        Ok(config) => config.base_url,
        Err(error) => {
            tracing::warn!(%error, "ignoring invalid USERS_API_URL");
            ApiConfig::default().base_url
        }
    }
}

#[cfg(any(test, not(feature = "hydrate")))]
fn unavailable_message(request: &HttpRequest) -> String {
    format!("{} {} is not available on the server", request.method.as_str(), request.path)
}

/// `Transport` over the browser `fetch` API.
#[derive(Clone, Debug)]
pub struct BrowserTransport {
    base_url: String,
}

impl Default for BrowserTransport {
    fn default() -> Self {
        Self::new(resolve_base_url(option_env!("USERS_API_URL")))
    }
}

impl BrowserTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;
            use users::Method;

            let url = users::http::join_url(&self.base_url, &request.path);
            let builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Delete => Request::delete(&url),
            };
            let sent = match &request.body {
                Some(body) => {
                    let prepared = builder
                        .json(body)
                        .map_err(|e| ApiError::Transport(e.to_string()))?;
                    prepared.send().await
                }
                None => builder.send().await,
            };
            let response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            Ok(HttpResponse::new(status, body))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Transport(unavailable_message(&request)))
        }
    }
}
