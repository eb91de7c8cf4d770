//! Confirmation dialog shown before a user is deleted.

use leptos::prelude::*;
use users::User;

#[component]
pub fn DeleteUserModal(user: User, on_cancel: Callback<()>, on_confirm: Callback<()>) -> impl IntoView {
    let on_keydown = Callback::new(move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            on_cancel.run(());
        }
    });
    let label = user.name.filter(|name| !name.is_empty()).unwrap_or(user.email);

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div
                class="dialog dialog--confirm"
                role="alertdialog"
                aria-modal="true"
                on:click=move |ev| ev.stop_propagation()
                on:keydown=move |ev| on_keydown.run(ev)
                tabindex="0"
            >
                <h2>"Confirm deletion"</h2>
                <p class="dialog__message">
                    "Are you sure you want to delete this user? "
                    <strong>{label}</strong>
                </p>
                <div class="dialog__actions">
                    <button type="button" class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button type="button" class="btn btn--danger" on:click=move |_| on_confirm.run(())>
                        "Confirm"
                    </button>
                </div>
            </div>
        </div>
    }
}
