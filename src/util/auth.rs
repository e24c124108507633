//! Shared access-guard helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes apply identical behavior: hold rendering while the
//! session bootstraps, render once authenticated, otherwise send the user to
//! `/login`. The decision is recomputed from the current [`AuthState`] on
//! every evaluation and never cached.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::{AuthState, SessionPhase};

pub const LOGIN_ROUTE: &str = "/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// What a protected route should show for a given session snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Neutral loading indicator; children withheld.
    Loading,
    Render,
    RedirectToLogin,
}

#[must_use]
pub fn decide(state: &AuthState) -> GuardDecision {
    match state.phase() {
        SessionPhase::Bootstrapping => GuardDecision::Loading,
        SessionPhase::Authenticated => GuardDecision::Render,
        SessionPhase::Anonymous => GuardDecision::RedirectToLogin,
    }
}

/// Whether a guest-only page (login, signup) should bounce to the dashboard.
#[must_use]
pub fn should_leave_guest_page(state: &AuthState) -> bool {
    decide(state) == GuardDecision::Render
}

/// Redirect signed-in users away from login/signup to the dashboard.
pub fn install_guest_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_leave_guest_page(&auth.get()) {
            navigate(DASHBOARD_ROUTE, NavigateOptions { replace: true, ..Default::default() });
        }
    });
}
