//! Cache-aware reads and invalidating mutations for the users resource.
//!
//! SYSTEM CONTEXT
//! ==============
//! `UserQueries` is the only surface the view layer touches. It is built once
//! at startup, shared by cloning (an `Arc` inside), and torn down with
//! `clear`. Reads go through the query cache; writes go straight to the API
//! and, on success only, invalidate the affected keys and emit a
//! `CacheEvent` so every holder of those keys re-requests.

#[cfg(test)]
#[path = "queries_test.rs"]
mod queries_test;

use std::sync::Arc;

use futures::channel::mpsc;

use crate::api::UserApi;
use crate::cache::{CacheEvent, CacheStats, InvalidationBus, KeyFilter, QueryKey, QueryStore, Snapshot};
use crate::error::ApiError;
use crate::http::Transport;
use crate::model::{CreateUserInput, UpdateUserInput, User};
use crate::mutation::MutationState;

/// Resource family name used in every users cache key.
pub const USERS_RESOURCE: &str = "users";

/// Result of a successful `remove`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Deleted,
    /// The server reported 404: the user was already gone.
    AlreadyGone,
}

struct Inner<T> {
    api: UserApi<T>,
    lists: QueryStore<Vec<User>>,
    details: QueryStore<User>,
    bus: InvalidationBus,
    create: MutationState,
    update: MutationState,
    remove: MutationState,
}

/// Query/cache layer over [`UserApi`].
pub struct UserQueries<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for UserQueries<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> UserQueries<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                api: UserApi::new(transport),
                lists: QueryStore::new(),
                details: QueryStore::new(),
                bus: InvalidationBus::default(),
                create: MutationState::default(),
                update: MutationState::default(),
                remove: MutationState::default(),
            }),
        }
    }

    #[must_use]
    pub fn list_key() -> QueryKey {
        QueryKey::list(USERS_RESOURCE)
    }

    #[must_use]
    pub fn detail_key(id: &str) -> QueryKey {
        QueryKey::detail(USERS_RESOURCE, id)
    }

    pub fn api(&self) -> &UserApi<T> {
        &self.inner.api
    }

    /// All users, cached under `["users","list"]`.
    ///
    /// # Errors
    ///
    /// Errors from [`UserApi::list_all`], unchanged.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let key = Self::list_key();
        self.inner.lists.fetch(&key, || self.inner.api.list_all()).await
    }

    /// One user, cached under `["users","detail",id]`.
    ///
    /// # Errors
    ///
    /// Errors from [`UserApi::get_by_id`], unchanged.
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let key = Self::detail_key(id);
        self.inner.details.fetch(&key, || self.inner.api.get_by_id(id)).await
    }

    #[must_use]
    pub fn peek_list(&self) -> Option<Snapshot<Vec<User>>> {
        self.inner.lists.peek(&Self::list_key())
    }

    #[must_use]
    pub fn peek_user(&self, id: &str) -> Option<Snapshot<User>> {
        self.inner.details.peek(&Self::detail_key(id))
    }

    /// Create a user, then invalidate every users list.
    ///
    /// # Errors
    ///
    /// Errors from [`UserApi::create`]; nothing is invalidated on failure.
    pub async fn create(&self, input: &CreateUserInput) -> Result<User, ApiError> {
        let guard = self.inner.create.begin();
        let result = self.inner.api.create(input).await;
        guard.settle(&result);
        if let Ok(user) = &result {
            tracing::info!(id = %user.id, "user created");
            self.invalidate(KeyFilter::lists(USERS_RESOURCE));
        }
        result
    }

    /// Update a user, then invalidate every users list and that user's detail.
    ///
    /// # Errors
    ///
    /// Errors from [`UserApi::update`]; nothing is invalidated on failure.
    pub async fn update(&self, id: &str, input: &UpdateUserInput) -> Result<User, ApiError> {
        let guard = self.inner.update.begin();
        let result = self.inner.api.update(id, input).await;
        guard.settle(&result);
        if result.is_ok() {
            tracing::info!(%id, "user updated");
            self.invalidate(KeyFilter::lists(USERS_RESOURCE));
            self.invalidate(KeyFilter::detail(USERS_RESOURCE, id));
        }
        result
    }

    /// Delete a user, then invalidate every users list and that user's detail.
    ///
    /// A 404 means the desired end state already holds, so it is reported as
    /// [`RemoveOutcome::AlreadyGone`] and invalidates like a success.
    ///
    /// # Errors
    ///
    /// Errors from [`UserApi::remove`] other than `NotFound`.
    pub async fn remove(&self, id: &str) -> Result<RemoveOutcome, ApiError> {
        let guard = self.inner.remove.begin();
        let result = match self.inner.api.remove(id).await {
            Ok(()) => Ok(RemoveOutcome::Deleted),
            Err(error) if error.is_not_found() => {
                tracing::info!(%id, "user already deleted");
                Ok(RemoveOutcome::AlreadyGone)
            }
            Err(error) => Err(error),
        };
        guard.settle(&result);
        if result.is_ok() {
            self.invalidate(KeyFilter::lists(USERS_RESOURCE));
            self.invalidate(KeyFilter::detail(USERS_RESOURCE, id));
        }
        result
    }

    /// Mark matching entries stale in every store and notify subscribers once.
    pub fn invalidate(&self, filter: KeyFilter) {
        let marked = self.inner.lists.invalidate(&filter) + self.inner.details.invalidate(&filter);
        tracing::debug!(%filter, marked, "cache invalidated");
        self.inner.bus.emit(&CacheEvent::Invalidated(filter));
    }

    /// Receive invalidation and teardown events.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<CacheEvent> {
        self.inner.bus.subscribe()
    }

    /// Drop all cached data (logout, page teardown).
    pub fn clear(&self) {
        self.inner.lists.clear();
        self.inner.details.clear();
        self.inner.bus.emit(&CacheEvent::Cleared);
        tracing::debug!("users cache cleared");
    }

    #[must_use]
    pub fn create_mutation(&self) -> &MutationState {
        &self.inner.create
    }

    #[must_use]
    pub fn update_mutation(&self) -> &MutationState {
        &self.inner.update
    }

    #[must_use]
    pub fn remove_mutation(&self) -> &MutationState {
        &self.inner.remove
    }

    #[must_use]
    pub fn list_stats(&self) -> CacheStats {
        self.inner.lists.stats()
    }

    #[must_use]
    pub fn detail_stats(&self) -> CacheStats {
        self.inner.details.stats()
    }
}
