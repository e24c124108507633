//! Route wrapper that only renders its children for a signed-in user.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::auth::AuthState;
use crate::util::auth::{GuardDecision, LOGIN_ROUTE, decide};

/// Withholds `children` while the session bootstraps and redirects to
/// `/login` when it resolves anonymous.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let decision = Memo::new(move |_| decide(&auth.get()));

    move || match decision.get() {
        GuardDecision::Loading => view! {
            <div class="guard-loading" role="status" aria-live="polite">
                <span class="spinner" aria-hidden="true"></span>
                <span class="sr-only">"Loading..."</span>
            </div>
        }
        .into_any(),
        GuardDecision::Render => children().into_any(),
        GuardDecision::RedirectToLogin => view! { <Redirect path=LOGIN_ROUTE /> }.into_any(),
    }
}
