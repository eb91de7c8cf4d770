//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use users::UserQueries;

use crate::net::transport::BrowserTransport;
use crate::pages::users::UsersPage;

/// Query layer shared through context by every component.
pub type Queries = UserQueries<BrowserTransport>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the single `UserQueries` instance for this app and provides it as
/// context before any page renders.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context::<Queries>(UserQueries::new(BrowserTransport::default()));

    view! {
        <Stylesheet id="leptos" href="/pkg/users-admin.css"/>
        <Title text="Users"/>

        <Router>
            <main class="app">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=UsersPage/>
                </Routes>
            </main>
        </Router>
    }
}
