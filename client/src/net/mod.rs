//! Networking for the users page.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` adapts the browser `fetch` API to `users::Transport`; all
//! request building, status classification and caching live in `users`.

pub mod transport;
