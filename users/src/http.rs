//! Transport seam between the resource API and a concrete HTTP stack.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle sends requests through `gloo-net`, the CLI through
//! `reqwest`, and tests through [`testing::ScriptedTransport`]. All of them
//! only build and send requests; status classification and decoding live in
//! `api` so every stack reports errors the same way.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP verbs used by the users resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A request relative to the configured base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path beginning with `/`, already percent-encoded.
    pub path: String,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status code plus the body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, String::new())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations return `Err(ApiError::Transport)` only when no response was
/// received. Futures are not required to be `Send` so browser fetch futures
/// qualify.
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request).await
    }
}

/// Join a base URL and a request path without doubling the slash.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    //! In-memory transport for tests of the API, cache and view layers.

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::error::ApiError;

    type Reply = Result<HttpResponse, ApiError>;

    /// Replays queued replies per `(method, path)` and records every request.
    ///
    /// Each `send` yields to the executor `delay` times before answering, so
    /// concurrent callers genuinely overlap on a single-threaded runtime.
    #[derive(Default)]
    pub struct ScriptedTransport {
        inner: Mutex<Script>,
    }

    #[derive(Default)]
    struct Script {
        replies: HashMap<(Method, String), VecDeque<Reply>>,
        sticky: HashMap<(Method, String), Reply>,
        requests: Vec<HttpRequest>,
        delay: usize,
    }

    impl ScriptedTransport {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Yield `delay` times inside every `send`.
        #[must_use]
        pub fn with_delay(self, delay: usize) -> Self {
            self.lock().delay = delay;
            self
        }

        /// Queue one reply for the next matching request.
        pub fn reply(&self, method: Method, path: &str, reply: Reply) {
            self.lock()
                .replies
                .entry((method, path.to_owned()))
                .or_default()
                .push_back(reply);
        }

        /// Answer every matching request with `reply` once the queue is empty.
        pub fn always(&self, method: Method, path: &str, reply: Reply) {
            self.lock().sticky.insert((method, path.to_owned()), reply);
        }

        /// Requests received so far, in order.
        #[must_use]
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.lock().requests.clone()
        }

        /// Number of requests matching `method` and `path`.
        #[must_use]
        pub fn count(&self, method: Method, path: &str) -> usize {
            self.lock()
                .requests
                .iter()
                .filter(|request| request.method == method && request.path == path)
                .count()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
            self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let delay = {
                let mut script = self.lock();
                script.requests.push(request.clone());
                script.delay
            };
            for _ in 0..delay {
                tokio::task::yield_now().await;
            }
            let key = (request.method, request.path.clone());
            let mut script = self.lock();
            if let Some(reply) = script.replies.get_mut(&key).and_then(VecDeque::pop_front) {
                return reply;
            }
            script.sticky.get(&key).cloned().unwrap_or_else(|| {
                Err(ApiError::Transport(format!(
                    "no scripted reply for {} {}",
                    request.method.as_str(),
                    request.path
                )))
            })
        }
    }
}
