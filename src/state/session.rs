//! Session controller: the owner of [`AuthState`] and its transitions.
//!
//! ARCHITECTURE
//! ============
//! One controller is built at startup and injected (via Leptos context) into
//! every consumer. It reads and writes the credential store, drives auth
//! calls through the shared [`ApiTransport`], and subscribes to the
//! transport's invalidation signal.
//!
//! ORDERING
//! ========
//! Every transition bumps `generation`. Bootstrap captures the generation
//! before suspending and drops its result if anything else transitioned in
//! the meantime, so a slow `/me` can never overwrite a fresh login. Login and
//! signup capture the invalidation epoch instead: a forced invalidation that
//! lands while they are in flight wins, and their success is discarded.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::auth::{AuthState, SessionChange};
use crate::net::api;
use crate::net::transport::{ApiError, ApiTransport, SESSION_EXPIRED_MESSAGE};
use crate::net::types::{AuthResponse, User};

type Listener = Rc<dyn Fn(&AuthState, SessionChange)>;

struct SessionInner {
    api: Rc<ApiTransport>,
    state: RefCell<AuthState>,
    generation: Cell<u64>,
    bootstrap_started: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

/// Cheaply cloneable handle to the process-wide session.
#[derive(Clone)]
pub struct SessionController {
    inner: Rc<SessionInner>,
}

impl SessionController {
    /// Create a controller in the `Bootstrapping` state and subscribe it to
    /// the transport's invalidation signal. Call [`Self::bootstrap`] next.
    #[must_use]
    pub fn new(api: Rc<ApiTransport>) -> Self {
        let inner = Rc::new(SessionInner {
            api,
            state: RefCell::new(AuthState::bootstrapping()),
            generation: Cell::new(0),
            bootstrap_started: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        });
        let weak: Weak<SessionInner> = Rc::downgrade(&inner);
        inner.api.invalidation().subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                SessionController { inner }.on_invalidated();
            }
        });
        Self { inner }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    #[must_use]
    pub fn transport(&self) -> Rc<ApiTransport> {
        self.inner.api.clone()
    }

    /// Register a callback run after every transition with the new state.
    pub fn subscribe(&self, listener: impl Fn(&AuthState, SessionChange) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Resolve the startup state from the stored token. Runs at most once;
    /// later calls, or calls after another transition, do nothing.
    pub async fn bootstrap(&self) {
        if self.inner.bootstrap_started.replace(true) {
            return;
        }
        let generation = self.generation();
        let Some(token) = self.inner.api.store().read() else {
            log::debug!("session: no stored token");
            self.transition(AuthState::anonymous(), SessionChange::Bootstrapped);
            return;
        };

        let result = api::fetch_current_user(&self.inner.api).await;
        if self.generation() != generation {
            log::debug!("session: discarding stale bootstrap result");
            return;
        }
        match result {
            Ok(user) => {
                log::info!("session: resumed as {}", user.username);
                self.transition(AuthState::authenticated(user, token), SessionChange::Bootstrapped);
            }
            Err(e) => {
                log::info!("session: stored token rejected: {e}");
                self.inner.api.store().clear();
                self.transition(AuthState::anonymous(), SessionChange::Bootstrapped);
            }
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the display message on failure; state is left unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, String> {
        let epoch = self.inner.api.invalidation().epoch();
        let result = api::login(&self.inner.api, email, password).await;
        self.accept_credentials(result, epoch, "login")
    }

    /// Create an account and sign straight in.
    ///
    /// # Errors
    ///
    /// Returns the display message on failure; state is left unchanged.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<User, String> {
        let epoch = self.inner.api.invalidation().epoch();
        let result = api::signup(&self.inner.api, username, email, password).await;
        self.accept_credentials(result, epoch, "signup")
    }

    fn accept_credentials(
        &self,
        result: Result<AuthResponse, ApiError>,
        epoch: u64,
        action: &str,
    ) -> Result<User, String> {
        let resp = result.map_err(|e| {
            log::info!("session: {action} failed: {e}");
            e.to_string()
        })?;
        if self.inner.api.invalidation().epoch() != epoch {
            log::warn!("session: {action} raced a forced invalidation; discarding");
            return Err(SESSION_EXPIRED_MESSAGE.to_owned());
        }
        log::info!("session: {action} succeeded for {}", resp.user.username);
        self.inner.api.store().save(&resp.token);
        let user = resp.user.clone();
        self.transition(AuthState::authenticated(resp.user, resp.token), SessionChange::SignedIn);
        Ok(user)
    }

    /// Drop the session locally. No network call; cannot fail.
    pub fn logout(&self) {
        log::info!("session: logout");
        self.inner.api.store().clear();
        self.transition(AuthState::anonymous(), SessionChange::SignedOut);
    }

    /// Permanently delete the account after re-entering the password.
    ///
    /// # Errors
    ///
    /// Returns the display message on failure (e.g. wrong password); the
    /// session and stored token are left untouched.
    pub async fn delete_account(&self, password: &str) -> Result<(), String> {
        if password.is_empty() {
            return Err("Enter your password to confirm.".to_owned());
        }
        match api::delete_account(&self.inner.api, password).await {
            Ok(()) => {
                log::info!("session: account deleted");
                self.inner.api.store().clear();
                self.transition(AuthState::anonymous(), SessionChange::AccountDeleted);
                Ok(())
            }
            Err(e) => {
                log::info!("session: account deletion failed: {e}");
                Err(e.to_string())
            }
        }
    }

    fn on_invalidated(&self) {
        log::warn!("session: forced invalidation");
        self.inner.api.store().clear();
        self.transition(AuthState::anonymous(), SessionChange::Invalidated);
    }

    fn transition(&self, next: AuthState, change: SessionChange) {
        self.inner.generation.set(self.inner.generation.get() + 1);
        self.inner.bootstrap_started.set(true);
        *self.inner.state.borrow_mut() = next.clone();
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&next, change);
        }
    }
}
