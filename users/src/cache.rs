//! In-memory query cache with per-key in-flight deduplication.
//!
//! DESIGN
//! ======
//! Entries are addressed by a structured `QueryKey` (`["users","list"]`,
//! `["users","detail",id]`) and stay valid until invalidated; there is no
//! time-based expiry. The first reader of a missing or stale key leads the
//! fetch; concurrent readers of the same key park on a oneshot channel and
//! receive the leader's result, so one key never has two independent fetches.
//!
//! Invalidation marks entries stale instead of rewriting them, keeping the last
//! value around for display while a refetch is pending. A result that arrives
//! for an entry invalidated mid-flight is handed to its waiters but stored as
//! stale. A reader arriving after that invalidation never joins the stale
//! flight: it starts a new one, and the superseded flight settles only its
//! own waiters without touching the entry.
//!
//! TRADE-OFFS
//! ==========
//! Readers are futures, not tasks. When a leader future is dropped (its view
//! unmounted) a drop guard clears the flight; parked readers observe the
//! cancelled channel and retry, and one of them becomes the new leader.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::channel::{mpsc, oneshot};

use crate::error::ApiError;

/// Kind of read a key addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    List,
    Detail,
}

impl Scope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

/// Composite cache key: resource family, read scope and optional id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: String,
    pub scope: Scope,
    pub id: Option<String>,
}

impl QueryKey {
    #[must_use]
    pub fn list(resource: &str) -> Self {
        Self {
            resource: resource.to_owned(),
            scope: Scope::List,
            id: None,
        }
    }

    #[must_use]
    pub fn detail(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_owned(),
            scope: Scope::Detail,
            id: Some(id.to_owned()),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\",\"{}\"", self.resource, self.scope.as_str())?;
        if let Some(id) = &self.id {
            write!(f, ",\"{id}\"")?;
        }
        f.write_str("]")
    }
}

/// Prefix match over query keys, used for invalidation.
///
/// Unset parts match anything: `KeyFilter::lists("users")` matches every list
/// key of the family, `KeyFilter::family("users")` matches all of its keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFilter {
    pub resource: String,
    pub scope: Option<Scope>,
    pub id: Option<String>,
}

impl KeyFilter {
    #[must_use]
    pub fn family(resource: &str) -> Self {
        Self {
            resource: resource.to_owned(),
            scope: None,
            id: None,
        }
    }

    #[must_use]
    pub fn lists(resource: &str) -> Self {
        Self {
            scope: Some(Scope::List),
            ..Self::family(resource)
        }
    }

    #[must_use]
    pub fn detail(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_owned(),
            scope: Some(Scope::Detail),
            id: Some(id.to_owned()),
        }
    }

    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        self.resource == key.resource
            && self.scope.is_none_or(|scope| scope == key.scope)
            && self.id.as_ref().is_none_or(|id| key.id.as_ref() == Some(id))
    }
}

impl fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\"", self.resource)?;
        if let Some(scope) = self.scope {
            write!(f, ",\"{}\"", scope.as_str())?;
        }
        if let Some(id) = &self.id {
            write!(f, ",\"{id}\"")?;
        }
        f.write_str(",..]")
    }
}

/// Notification delivered to cache subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    /// Entries matching the filter are no longer authoritative; holders re-request.
    Invalidated(KeyFilter),
    /// The whole cache was torn down.
    Cleared,
}

/// Fan-out of cache events to every live subscriber.
#[derive(Default)]
pub struct InvalidationBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<CacheEvent>>>,
}

impl InvalidationBus {
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<CacheEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.lock().push(tx);
        rx
    }

    /// Deliver `event` to all subscribers, dropping those whose receiver is gone.
    pub fn emit(&self, event: &CacheEvent) {
        self.lock().retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<CacheEvent>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Point-in-time view of one entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<V> {
    /// Last successfully fetched value, possibly stale.
    pub data: Option<V>,
    /// False once invalidated, until a refetch lands.
    pub fresh: bool,
    /// A fetch for this key is in flight.
    pub fetching: bool,
}

/// Counters for one store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from a fresh entry.
    pub hits: u64,
    /// Reads that led a network fetch.
    pub fetches: u64,
    /// Reads that joined a fetch already in flight.
    pub joins: u64,
    /// Entries marked stale by invalidation.
    pub invalidations: u64,
}

type Waiter<V> = oneshot::Sender<Result<V, ApiError>>;

struct Flight<V> {
    id: u64,
    stale: bool,
    waiters: Vec<Waiter<V>>,
}

struct Entry<V> {
    data: Option<V>,
    fresh: bool,
    flight: Option<Flight<V>>,
    /// Stale flights replaced by a newer one, still owed to their waiters.
    superseded: Vec<Flight<V>>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            fresh: false,
            flight: None,
            superseded: Vec::new(),
        }
    }
}

struct StoreInner<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    next_flight: u64,
    stats: CacheStats,
}

enum Step<V> {
    Hit(V),
    Wait(oneshot::Receiver<Result<V, ApiError>>),
    Lead(u64),
}

/// Cache of values of one type, keyed by [`QueryKey`].
pub struct QueryStore<V> {
    inner: Mutex<StoreInner<V>>,
}

impl<V> Default for QueryStore<V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::new(),
                next_flight: 0,
                stats: CacheStats::default(),
            }),
        }
    }
}

impl<V: Clone> QueryStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the fresh cached value for `key`, or fetch it.
    ///
    /// At most one `fetcher` runs per key at a time; concurrent callers share
    /// its result. Errors are not cached.
    ///
    /// # Errors
    ///
    /// Whatever the leading fetch returned.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<V, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let flight_id = loop {
            match self.step(key) {
                Step::Hit(value) => return Ok(value),
                Step::Wait(rx) => match rx.await {
                    Ok(result) => return result,
                    Err(oneshot::Canceled) => {
                        tracing::debug!(%key, "in-flight fetch abandoned, retrying");
                    }
                },
                Step::Lead(id) => break id,
            }
        };

        let mut guard = FlightGuard {
            store: self,
            key,
            id: flight_id,
            settled: false,
        };
        tracing::debug!(%key, "cache fetch");
        let result = fetcher().await;
        guard.settle(&result);
        result
    }

    /// Mark every entry matching `filter` stale. Returns how many were marked.
    pub fn invalidate(&self, filter: &KeyFilter) -> usize {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut marked = 0;
        for (key, entry) in &mut inner.entries {
            if !filter.matches(key) {
                continue;
            }
            if entry.data.is_none() && entry.flight.is_none() {
                continue;
            }
            entry.fresh = false;
            if let Some(flight) = &mut entry.flight {
                flight.stale = true;
            }
            marked += 1;
        }
        inner.stats.invalidations += marked as u64;
        marked
    }

    /// Current state of `key` without triggering a fetch.
    #[must_use]
    pub fn peek(&self, key: &QueryKey) -> Option<Snapshot<V>> {
        self.lock().entries.get(key).map(|entry| Snapshot {
            data: entry.data.clone(),
            fresh: entry.fresh,
            fetching: entry.flight.is_some(),
        })
    }

    /// Drop every entry. Parked readers are released and refetch on demand.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn step(&self, key: &QueryKey) -> Step<V> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let entry = inner.entries.entry(key.clone()).or_default();

        if entry.fresh {
            if let Some(data) = &entry.data {
                inner.stats.hits += 1;
                return Step::Hit(data.clone());
            }
        }
        if let Some(flight) = &mut entry.flight {
            if !flight.stale {
                let (tx, rx) = oneshot::channel();
                flight.waiters.push(tx);
                inner.stats.joins += 1;
                return Step::Wait(rx);
            }
        }
        if let Some(stale) = entry.flight.take() {
            tracing::debug!(%key, "stale fetch superseded");
            entry.superseded.push(stale);
        }

        inner.next_flight += 1;
        let id = inner.next_flight;
        entry.flight = Some(Flight {
            id,
            stale: false,
            waiters: Vec::new(),
        });
        inner.stats.fetches += 1;
        Step::Lead(id)
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a flight when its leader finishes or is dropped mid-fetch.
struct FlightGuard<'a, V: Clone> {
    store: &'a QueryStore<V>,
    key: &'a QueryKey,
    id: u64,
    settled: bool,
}

impl<V: Clone> FlightGuard<'_, V> {
    fn settle(&mut self, result: &Result<V, ApiError>) {
        self.settled = true;
        let waiters = {
            let mut guard = self.store.lock();
            let Some(entry) = guard.entries.get_mut(self.key) else {
                return;
            };
            if entry.flight.as_ref().is_some_and(|flight| flight.id == self.id) {
                let Some(flight) = entry.flight.take() else {
                    return;
                };
                if let Ok(value) = result {
                    entry.data = Some(value.clone());
                    entry.fresh = !flight.stale;
                }
                flight.waiters
            } else if let Some(index) = entry.superseded.iter().position(|flight| flight.id == self.id) {
                entry.superseded.swap_remove(index).waiters
            } else {
                return;
            }
        };
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
    }
}

impl<V: Clone> Drop for FlightGuard<'_, V> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut guard = self.store.lock();
        if let Some(entry) = guard.entries.get_mut(self.key) {
            if entry.flight.as_ref().is_some_and(|flight| flight.id == self.id) {
                entry.flight = None;
            }
            entry.superseded.retain(|flight| flight.id != self.id);
        }
    }
}
