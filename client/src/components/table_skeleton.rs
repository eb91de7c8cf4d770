//! Placeholder rows shown while the users list loads.

use leptos::prelude::*;

const SKELETON_ROWS: usize = 5;
const SKELETON_COLUMNS: usize = 6;

#[component]
pub fn TableSkeleton() -> impl IntoView {
    view! {
        <div class="table-skeleton" aria-busy="true" aria-label="Loading users">
            {(0..SKELETON_ROWS)
                .map(|_| {
                    view! {
                        <div class="table-skeleton__row">
                            {(0..SKELETON_COLUMNS)
                                .map(|_| view! { <span class="table-skeleton__cell"></span> })
                                .collect_view()}
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
