//! Typed client for the `/users` REST resource.
//!
//! ARCHITECTURE
//! ============
//! `model` holds the wire DTOs, `http` the transport seam, `api` the five
//! resource operations and their error classification. `cache` and `mutation`
//! are resource-agnostic; `queries` wires them to the users resource with its
//! invalidation rules. `text` holds display helpers every front end shares.
//! This crate is UI-framework agnostic so the browser client and the CLI
//! share one implementation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod mutation;
pub mod queries;
pub mod text;

pub use api::UserApi;
pub use cache::{CacheEvent, KeyFilter, QueryKey};
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError, FieldErrors};
pub use http::{HttpRequest, HttpResponse, Method, Transport};
pub use model::{CreateUserInput, MIN_PASSWORD_LEN, UpdateUserInput, User};
pub use mutation::MutationStatus;
pub use queries::{RemoveOutcome, UserQueries};
pub use text::truncate_chars;
