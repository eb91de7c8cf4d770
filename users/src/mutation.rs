//! Per-mutation status tracking
//! (`idle -> pending -> {success -> idle, error -> idle}`).
//!
//! The view layer polls this to disable submit buttons and show progress
//! text. Overlapping calls are counted, so the status stays `Pending` until the
//! last one settles. A failure holds `Error` until the view acknowledges it
//! with `reset` (its dialog closes) or the next call begins.

#[cfg(test)]
#[path = "mutation_test.rs"]
mod mutation_test;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    /// The last call failed; back to `Idle` on `reset` or the next call.
    Error,
}

#[derive(Default)]
struct MutationInner {
    in_flight: usize,
    failed: bool,
}

/// Status of one kind of mutation (create, update or remove).
#[derive(Default)]
pub struct MutationState {
    inner: Mutex<MutationInner>,
}

impl MutationState {
    #[must_use]
    pub fn status(&self) -> MutationStatus {
        let inner = self.lock();
        if inner.in_flight > 0 {
            MutationStatus::Pending
        } else if inner.failed {
            MutationStatus::Error
        } else {
            MutationStatus::Idle
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// Acknowledge a failure, e.g. when its dialog is closed.
    pub fn reset(&self) {
        self.lock().failed = false;
    }

    /// Enter `Pending`. Settle the returned guard with the call's result;
    /// dropping it unsettled (the caller went away) exits `Pending` without
    /// recording an outcome.
    #[must_use]
    pub fn begin(&self) -> MutationGuard<'_> {
        let mut inner = self.lock();
        inner.in_flight += 1;
        inner.failed = false;
        MutationGuard {
            state: self,
            settled: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MutationInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MutationGuard<'a> {
    state: &'a MutationState,
    settled: bool,
}

impl MutationGuard<'_> {
    pub fn settle<T>(mut self, result: &Result<T, ApiError>) {
        self.settled = true;
        let mut inner = self.state.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        inner.failed = result.is_err();
    }
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.state.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}
