//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the users table and its dialogs. They read the shared
//! `UserQueries` from Leptos context and keep form state local.

pub mod create_user_modal;
pub mod delete_user_modal;
pub mod edit_user_modal;
pub mod field_error;
pub mod password_input;
pub mod table_skeleton;
pub mod user_table;
