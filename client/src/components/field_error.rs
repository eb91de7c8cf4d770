//! Inline validation message under a form field.

use leptos::prelude::*;

#[component]
pub fn FieldError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message
            .get()
            .map(|text| view! { <p class="dialog__field-error" role="alert">{text}</p> })
    }
}
