//! Which dialog the users page shows.
//!
//! At most one dialog is open. Deleting takes two actions: the row's Delete
//! button only opens the confirmation, and `confirm_delete` hands out the id.

#[cfg(test)]
#[path = "dialogs_test.rs"]
mod dialogs_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use users::User;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Create,
    Edit(User),
    ConfirmDelete(User),
}

impl DialogState {
    pub fn open_create(&mut self) {
        *self = Self::Create;
    }

    pub fn open_edit(&mut self, user: User) {
        *self = Self::Edit(user);
    }

    pub fn request_delete(&mut self, user: User) {
        *self = Self::ConfirmDelete(user);
    }

    /// Close the confirmation and return the id to delete, if one was pending.
    pub fn confirm_delete(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::ConfirmDelete(user) => Some(user.id),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    pub fn editing(&self) -> Option<&User> {
        match self {
            Self::Edit(user) => Some(user),
            _ => None,
        }
    }

    pub fn deleting(&self) -> Option<&User> {
        match self {
            Self::ConfirmDelete(user) => Some(user),
            _ => None,
        }
    }
}

/// Whether one mounted dialog is still showing.
///
/// A submission outlives its dialog; it holds a clone of the lease and only
/// touches dialog state while the lease is live, so a late result never closes
/// a dialog opened after it.
#[derive(Clone, Debug)]
pub struct DialogLease(Arc<AtomicBool>);

impl Default for DialogLease {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl DialogLease {
    /// Called when the dialog unmounts.
    pub fn release(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Run `f` only while the dialog is still showing. Returns whether it ran.
    pub fn run_if_live(&self, f: impl FnOnce()) -> bool {
        if !self.is_live() {
            return false;
        }
        f();
        true
    }
}
