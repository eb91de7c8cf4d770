//! Plain state structs held in `RwSignal`s by the users page.
//!
//! DESIGN
//! ======
//! Nothing here touches Leptos; each struct is a view-model with pure
//! transitions so it can be unit tested natively.

pub mod dialogs;
pub mod forms;
pub mod table;
