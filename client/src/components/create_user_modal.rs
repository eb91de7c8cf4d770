//! Dialog for creating a user.
//!
//! The dialog owns its form state, so closing it (Cancel, Escape, backdrop)
//! and reopening starts from a blank form. It closes itself only after a
//! successful create; failures keep it open with the errors inline.

use leptos::prelude::*;
use users::MutationStatus;

use crate::app::Queries;
use crate::components::field_error::FieldError;
use crate::components::password_input::PasswordInput;
use crate::state::dialogs::DialogLease;
use crate::state::forms::{CreateUserForm, SubmitOutcome, submit_create, with_status};

#[component]
pub fn CreateUserModal(status: RwSignal<MutationStatus>, on_close: Callback<()>) -> impl IntoView {
    let queries = expect_context::<Queries>();
    let form = RwSignal::new(CreateUserForm::default());
    let lease = DialogLease::default();

    {
        let lease = lease.clone();
        let queries = queries.clone();
        on_cleanup(move || {
            lease.release();
            queries.create_mutation().reset();
            let _ = status.try_set(queries.create_mutation().status());
        });
    }

    let on_keydown = Callback::new(move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            on_close.run(());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if queries.create_mutation().is_pending() {
            return;
        }
        let queries = queries.clone();
        let lease = lease.clone();
        let snapshot = form.get_untracked();
        leptos::task::spawn_local(async move {
            let report = move |current: MutationStatus| {
                let _ = status.try_set(current);
            };
            let outcome = with_status(queries.create_mutation(), submit_create(&queries, &snapshot), report).await;
            lease.run_if_live(|| match outcome {
                SubmitOutcome::Done(user) => {
                    tracing::info!(id = %user.id, "created user from dialog");
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
                <h2>"Create new user"</h2>
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
                            placeholder="Enter a password"
                        />
                    </label>
                    <FieldError message=error_for("password")/>

                    <FieldError message=Signal::derive(move || form.with(|f| f.errors.message.clone()))/>

                    <div class="dialog__actions">
                        <button type="button" class="btn" on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn--primary" disabled=move || status.get() == MutationStatus::Pending>
                            {move || if status.get() == MutationStatus::Pending { "Creating..." } else { "Create" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
