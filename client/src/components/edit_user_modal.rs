//! Dialog for editing a user.

use leptos::prelude::*;
use users::{MutationStatus, User};

use crate::app::Queries;
use crate::components::field_error::FieldError;
use crate::components::password_input::PasswordInput;
use crate::state::dialogs::DialogLease;
use crate::state::forms::{EditUserForm, SubmitOutcome, submit_edit, with_status};

/// Edit dialog seeded from `user`. Leaving the password blank keeps it.
#[component]
pub fn EditUserModal(user: User, status: RwSignal<MutationStatus>, on_close: Callback<()>) -> impl IntoView {
    let queries = expect_context::<Queries>();
    let form = RwSignal::new(EditUserForm::from_user(&user));
    let lease = DialogLease::default();

    {
        let lease = lease.clone();
        let queries = queries.clone();
        on_cleanup(move || {
            lease.release();
            queries.update_mutation().reset();
            let _ = status.try_set(queries.update_mutation().status());
        });
    }
    let user_id = user.id;

    let on_keydown = Callback::new(move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            on_close.run(());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if queries.update_mutation().is_pending() {
            return;
        }
        let queries = queries.clone();
        let lease = lease.clone();
        let id = user_id.clone();
        let snapshot = form.get_untracked();
        leptos::task::spawn_local(async move {
            let report = move |current: MutationStatus| {
                let _ = status.try_set(current);
            };
            let outcome = with_status(queries.update_mutation(), submit_edit(&queries, &id, &snapshot), report).await;
            lease.run_if_live(|| match outcome {
                SubmitOutcome::Done(_) => {
                    on_close.run(());
                }
                SubmitOutcome::Busy => {}
                SubmitOutcome::Invalid(errors) => form.update(|f| f.errors = errors),
                SubmitOutcome::Failed(error) => form.update(|f| f.show_error(&error)),
            });
        });
    };

    let error_for = move |field: &'static str| Signal::derive(move || form.with(|f| f.error_for(field)));

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_close.run(())>
            <div
                class="dialog dialog--user"
                role="dialog"
                aria-modal="true"
                on:click=move |ev| ev.stop_propagation()
                on:keydown=move |ev| on_keydown.run(ev)
                tabindex="0"
            >
                <h2>"Edit user"</h2>
                <form class="dialog__form" on:submit=on_submit novalidate=true>
                    <label class="dialog__label">
                        "Name"
                        <input
                            class="dialog__input"
                            placeholder="Enter a name"
                            prop:value=move || form.with(|f| f.name.clone())
                            on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        />
                    </label>
                    <FieldError message=error_for("name")/>

                    <label class="dialog__label">
                        "Email"
                        <input
                            class="dialog__input"
                            type="email"
                            placeholder="Enter an email"
                            prop:value=move || form.with(|f| f.email.clone())
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        />
                    </label>
                    <FieldError message=error_for("email")/>

                    <label class="dialog__label">
                        "About"
                        <textarea
                            class="dialog__textarea"
                            placeholder="Enter a description"
                            prop:value=move || form.with(|f| f.about.clone())
                            on:input=move |ev| form.update(|f| f.about = event_target_value(&ev))
                        ></textarea>
                    </label>
                    <FieldError message=error_for("about")/>

                    <label class="dialog__label">
                        "Password"
                        <PasswordInput
                            value=Signal::derive(move || form.with(|f| f.password.clone()))
                            on_input=Callback::new(move |value: String| form.update(|f| f.password = value))
                            placeholder="Leave blank to keep the current password"
                        />
                    </label>
                    <FieldError message=error_for("password")/>

                    <FieldError message=Signal::derive(move || form.with(|f| f.errors.message.clone()))/>

                    <div class="dialog__actions">
                        <button type="button" class="btn" on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn--primary" disabled=move || status.get() == MutationStatus::Pending>
                            {move || if status.get() == MutationStatus::Pending { "Updating..." } else { "Update" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
