//! Password input with a show/hide toggle.

use leptos::prelude::*;

#[component]
pub fn PasswordInput(
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let visible = RwSignal::new(false);

    view! {
        <div class="password-input">
            <input
                class="dialog__input"
                type=move || if visible.get() { "text" } else { "password" }
                placeholder=placeholder
                autocomplete="new-password"
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            <button
                type="button"
                class="btn btn--ghost password-input__toggle"
                on:click=move |_| visible.update(|v| *v = !*v)
                title=move || if visible.get() { "Hide password" } else { "Show password" }
            >
                {move || if visible.get() { "Hide" } else { "Show" }}
            </button>
        </div>
    }
}
