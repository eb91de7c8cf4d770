//! Users table: filter box, page-size picker, rows and pager.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders whatever `ListPhase` the page holds. Filtering and paging are pure
//! `TableState` transitions; row actions are reported upward through
//! callbacks so the page owns the dialogs.

use leptos::prelude::*;
use users::User;

use crate::components::table_skeleton::TableSkeleton;
use crate::state::table::{ListPhase, PAGE_SIZE_OPTIONS, TablePage, TableState, UserRow, rows_from_users};

#[component]
pub fn UserTable(
    list: RwSignal<ListPhase>,
    table: RwSignal<TableState>,
    on_create: Callback<()>,
    on_edit: Callback<User>,
    on_delete: Callback<User>,
) -> impl IntoView {
    let rows = Memo::new(move |_| match list.get() {
        ListPhase::Ready(users) => rows_from_users(&users),
        ListPhase::Loading | ListPhase::Failed(_) => Vec::new(),
    });
    let page = Memo::new(move |_| {
        let state = table.get();
        rows.with(|rows| state.page(rows))
    });

    let on_page_size = move |ev: leptos::ev::Event| {
        let Ok(size) = event_target_value(&ev).parse::<usize>() else {
            return;
        };
        let matched = page.with_untracked(|p| p.matched);
        table.update(|t| {
            t.set_page_size(size, matched);
        });
    };
    let on_previous = move |_| {
        let matched = page.with_untracked(|p| p.matched);
        table.update(|t| {
            t.clamp(matched);
            t.previous();
        });
    };
    let on_next = move |_| {
        let matched = page.with_untracked(|p| p.matched);
        table.update(|t| {
            t.clamp(matched);
            t.next(matched);
        });
    };

    view! {
        <div class="users-table">
            <div class="users-table__toolbar">
                <div class="users-table__toolbar-left">
                    <input
                        class="users-table__filter"
                        type="search"
                        placeholder="Filter users..."
                        prop:value=move || table.with(|t| t.filter.clone())
                        on:input=move |ev| table.update(|t| t.set_filter(event_target_value(&ev)))
                    />
                    <button class="btn btn--primary" on:click=move |_| on_create.run(())>
                        "New user"
                    </button>
                </div>
                <select
                    class="users-table__page-size"
                    title="Rows per page"
                    prop:value=move || table.with(|t| t.page_size.to_string())
                    on:change=on_page_size
                >
                    {PAGE_SIZE_OPTIONS
                        .iter()
                        .map(|size| view! { <option value=size.to_string()>{size.to_string()}</option> })
                        .collect_view()}
                </select>
            </div>

            {move || match list.get() {
                ListPhase::Loading => view! { <TableSkeleton/> }.into_any(),
                ListPhase::Failed(message) => {
                    view! {
                        <div class="users-table__error" role="alert">
                            <p>{message}</p>
                        </div>
                    }
                        .into_any()
                }
                ListPhase::Ready(_) => {
                    view! {
                        <table class="users-table__table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th>"About"</th>
                                    <th>"Created"</th>
                                    <th>"Updated"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || render_rows(page.get(), on_edit, on_delete)}
                            </tbody>
                        </table>
                    }
                        .into_any()
                }
            }}

            <div class="users-table__pager">
                <span class="users-table__page-label">
                    {move || page.with(|p| format!("Page {} of {}", p.page_index + 1, p.page_count))}
                </span>
                <button class="btn btn--small" disabled=move || !page.with(TablePage::can_previous) on:click=on_previous>
                    "Previous"
                </button>
                <button class="btn btn--small" disabled=move || !page.with(TablePage::can_next) on:click=on_next>
                    "Next"
                </button>
            </div>
        </div>
    }
}

fn render_rows(page: TablePage, on_edit: Callback<User>, on_delete: Callback<User>) -> AnyView {
    if page.is_empty() {
        return view! {
            <tr>
                <td class="users-table__empty" colspan="6">"No results."</td>
            </tr>
        }
        .into_any();
    }
    page.rows.into_iter().map(|row| render_row(row, on_edit, on_delete)).collect_view().into_any()
}

fn render_row(row: UserRow, on_edit: Callback<User>, on_delete: Callback<User>) -> impl IntoView {
    let edit_user = row.user.clone();
    let delete_user = row.user;
    view! {
        <tr>
            <td>{row.name}</td>
            <td>{row.email}</td>
            <td class="users-table__about" title=row.about.tooltip>{row.about.text}</td>
            <td class="users-table__date">{row.created}</td>
            <td class="users-table__date">{row.updated}</td>
            <td class="users-table__actions">
                <button class="btn btn--small" on:click=move |_| on_edit.run(edit_user.clone())>
                    "Edit"
                </button>
                <button class="btn btn--small btn--danger" on:click=move |_| on_delete.run(delete_user.clone())>
                    "Delete"
                </button>
            </td>
        </tr>
    }
}
