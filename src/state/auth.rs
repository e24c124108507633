//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Snapshot read by route guards and user-aware components. Only the
//! [`SessionController`](super::session::SessionController) produces new
//! values, always wholesale, so `user` and `token` are set or cleared
//! together.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Coarse lifecycle phase derived from [`AuthState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Bootstrapping,
    Anonymous,
    Authenticated,
}

/// Why the session state last changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionChange {
    /// Startup resolution finished (resumed or anonymous).
    Bootstrapped,
    /// Login or signup succeeded.
    SignedIn,
    /// User-initiated logout.
    SignedOut,
    /// The server rejected the token; the UI should route to login.
    Invalidated,
    /// The account was destroyed.
    AccountDeleted,
}

/// Authentication state tracking the current user, token and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
}

impl AuthState {
    /// Initial state while the stored token is being validated.
    #[must_use]
    pub fn bootstrapping() -> Self {
        Self { user: None, token: None, loading: true }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(user: User, token: String) -> Self {
        Self { user: Some(user), token: Some(token), loading: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Bootstrapping
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}
