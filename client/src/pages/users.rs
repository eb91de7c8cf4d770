//! Users administration page.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only route. It reads the users list through the shared
//! `UserQueries`, re-reads it whenever a mutation invalidates the list key,
//! and owns which dialog is open plus the mutation status each dialog shows.
//! On cleanup it stops listening and clears the cache so a later mount starts
//! from the server again.

use leptos::prelude::*;
use users::User;

use crate::app::Queries;
use crate::components::create_user_modal::CreateUserModal;
use crate::components::delete_user_modal::DeleteUserModal;
use crate::components::edit_user_modal::EditUserModal;
use crate::components::user_table::UserTable;
use crate::state::dialogs::DialogState;
use crate::state::forms::{SubmitOutcome, submit_delete};
use crate::state::table::{ListPhase, TableState};

#[component]
pub fn UsersPage() -> impl IntoView {
    let queries = expect_context::<Queries>();
    let list = RwSignal::new(ListPhase::default());
    let table = RwSignal::new(TableState::default());
    let dialog = RwSignal::new(DialogState::default());
    let notice = RwSignal::new(None::<String>);
    let create_status = RwSignal::new(queries.create_mutation().status());
    let update_status = RwSignal::new(queries.update_mutation().status());

    #[cfg(feature = "hydrate")]
    {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        use futures::StreamExt;
        use users::CacheEvent;

        let alive = Arc::new(AtomicBool::new(true));
        let alive_task = alive.clone();
        let mut events = queries.subscribe();
        let loader = queries.clone();
        leptos::task::spawn_local(async move {
            load_list(&loader, list, &alive_task).await;
            while let Some(event) = events.next().await {
                if !alive_task.load(Ordering::Relaxed) {
                    break;
                }
                match event {
                    CacheEvent::Invalidated(filter) if filter.matches(&Queries::list_key()) => {
                        load_list(&loader, list, &alive_task).await;
                    }
                    CacheEvent::Invalidated(_) => {}
                    CacheEvent::Cleared => break,
                }
            }
        });

        let teardown = queries.clone();
        on_cleanup(move || {
            alive.store(false, Ordering::Relaxed);
            teardown.clear();
        });
    }

    let on_create = Callback::new(move |()| dialog.update(DialogState::open_create));
    let on_edit = Callback::new(move |user: User| dialog.update(|d| d.open_edit(user)));
    let on_delete = Callback::new(move |user: User| dialog.update(|d| d.request_delete(user)));
    let on_close = Callback::new(move |()| dialog.update(DialogState::close));

    let on_dismiss = Callback::new({
        let queries = queries.clone();
        move |()| {
            notice.set(None);
            queries.remove_mutation().reset();
        }
    });

    let on_delete_confirm = Callback::new(move |()| {
        let mut target = None;
        dialog.update(|d| target = d.confirm_delete());
        let Some(id) = target else {
            return;
        };
        notice.set(None);
        let queries = queries.clone();
        leptos::task::spawn_local(async move {
            match submit_delete(&queries, &id).await {
                SubmitOutcome::Done(outcome) => tracing::info!(%id, ?outcome, "delete finished"),
                SubmitOutcome::Failed(error) => notice.set(Some(error.user_message())),
                SubmitOutcome::Busy | SubmitOutcome::Invalid(_) => {}
            }
        });
    });

    view! {
        <div class="users-page">
            <header class="users-page__header">
                <h1>"Users"</h1>
            </header>

            {move || {
                notice
                    .get()
                    .map(|text| {
                        view! {
                            <div class="users-page__notice" role="alert">
                                <span>{text}</span>
                                <button class="btn btn--small" on:click=move |_| on_dismiss.run(())>
                                    "Dismiss"
                                </button>
                            </div>
                        }
                    })
            }}

            <UserTable list=list table=table on_create=on_create on_edit=on_edit on_delete=on_delete/>

            {move || match dialog.get() {
                DialogState::Closed => ().into_any(),
                DialogState::Create => view! { <CreateUserModal status=create_status on_close=on_close/> }.into_any(),
                DialogState::Edit(user) => view! { <EditUserModal user=user status=update_status on_close=on_close/> }.into_any(),
                DialogState::ConfirmDelete(user) => {
                    view! { <DeleteUserModal user=user on_cancel=on_close on_confirm=on_delete_confirm/> }.into_any()
                }
            }}
        </div>
    }
}

/// Read the list into `list`, keeping stale rows on screen while refetching.
#[cfg(feature = "hydrate")]
async fn load_list(queries: &Queries, list: RwSignal<ListPhase>, alive: &std::sync::atomic::AtomicBool) {
    use std::sync::atomic::Ordering;

    use crate::state::table::LIST_ERROR_MESSAGE;

    if !matches!(list.get_untracked(), ListPhase::Ready(_)) {
        list.set(ListPhase::Loading);
    }
    let result = queries.list().await;
    if !alive.load(Ordering::Relaxed) {
        return;
    }
    match result {
        Ok(users) => list.set(ListPhase::Ready(users)),
        Err(error) => {
            tracing::warn!(%error, "loading users failed");
            list.set(ListPhase::Failed(LIST_ERROR_MESSAGE.to_owned()));
        }
    }
}
