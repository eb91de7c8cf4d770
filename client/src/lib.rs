//! # client
//!
//! Leptos + WASM frontend for user administration: a filterable, paginated
//! users table with create, edit and delete dialogs.
//!
//! All data access goes through `users::UserQueries`; this crate adds the
//! browser transport, view-model state and components on top.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and hydrate the server-rendered
/// body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
