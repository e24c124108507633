//! Root component: service wiring, context providers and routes.
//!
//! ARCHITECTURE
//! ============
//! The session controller and link collection are single-threaded (`Rc`)
//! services, so they live in a local `StoredValue` handle. Components read
//! reactive mirrors (`RwSignal<AuthState>`, `RwSignal<LinksState>`) that the
//! services' listeners keep current; they call the services only to act.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::NavigateOptions;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::use_navigate;
use leptos_router::path;

use crate::components::protected_route::ProtectedRoute;
use crate::config::ClientConfig;
use crate::net::http::GlooBackend;
use crate::net::transport::ApiTransport;
use crate::pages::dashboard::DashboardPage;
use crate::pages::landing::LandingPage;
use crate::pages::login::LoginPage;
use crate::pages::signup::SignupPage;
use crate::state::auth::SessionChange;
use crate::state::links::{LinkCollection, LinksState};
use crate::state::session::SessionController;
use crate::util::auth::LOGIN_ROUTE;
use crate::util::credentials::LocalStorageCredentials;

/// Handles to the long-lived client services.
#[derive(Clone)]
pub struct AppServices {
    pub session: SessionController,
    pub links: LinkCollection,
}

/// Context type under which [`AppServices`] are provided.
pub type Services = StoredValue<AppServices, LocalStorage>;

/// Most recent session transition, for route-level reactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LastSessionChange(pub Option<SessionChange>);

fn build_services() -> AppServices {
    let config = ClientConfig::from_env();
    log::info!("app: api base {}", config.api_base_url);
    let transport = Rc::new(ApiTransport::new(
        &config,
        Rc::new(GlooBackend),
        Rc::new(LocalStorageCredentials),
    ));
    let session = SessionController::new(transport.clone());
    let links = LinkCollection::new(transport);
    links.attach(&session);
    AppServices { session, links }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let services = build_services();
    let auth = RwSignal::new(services.session.state());
    let links = RwSignal::new(LinksState::default());
    let last_change = RwSignal::new(LastSessionChange::default());

    services.session.subscribe(move |state, change| {
        auth.set(state.clone());
        last_change.set(LastSessionChange(Some(change)));
    });
    services.links.subscribe(move |state| links.set(state.clone()));

    #[cfg(feature = "csr")]
    {
        let session = services.session.clone();
        leptos::task::spawn_local(async move {
            session.bootstrap().await;
        });
    }

    provide_context::<Services>(StoredValue::new_local(services));
    provide_context(auth);
    provide_context(links);
    provide_context(last_change);

    view! {
        <Title text="Trimly" />
        <Router>
            <SessionRedirects />
            <main class="app">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=path!("/") view=LandingPage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/signup") view=SignupPage />
                    <Route
                        path=path!("/dashboard")
                        view=|| view! { <ProtectedRoute><DashboardPage /></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Sends the user to the login page after a forced invalidation.
#[component]
fn SessionRedirects() -> impl IntoView {
    let last_change = expect_context::<RwSignal<LastSessionChange>>();
    let navigate = use_navigate();
    Effect::new(move || {
        if last_change.get().0 == Some(SessionChange::Invalidated) {
            navigate(LOGIN_ROUTE, NavigateOptions { replace: true, ..Default::default() });
        }
    });
}
