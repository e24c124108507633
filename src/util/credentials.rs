//! Persistent bearer-token storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Exactly one token lives under [`TOKEN_STORAGE_KEY`]. The session
//! controller is the only writer; the API transport reads it on every request
//! and clears it (through this same trait) when the server rejects it.
//!
//! TRADE-OFFS
//! ==========
//! The browser store keeps the token as a plain `localStorage` string, readable
//! by any script on the origin. Storage failures are swallowed: a token that
//! could not be persisted behaves like a logged-out reload.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::cell::RefCell;

/// Well-known storage key holding the raw token.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Synchronous single-slot token store.
pub trait CredentialStore {
    fn save(&self, token: &str);
    fn read(&self) -> Option<String>;
    fn clear(&self);
}

/// `window.localStorage`-backed store used in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageCredentials;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl CredentialStore for LocalStorageCredentials {
    fn save(&self, token: &str) {
        #[cfg(feature = "csr")]
        {
            let Some(storage) = local_storage() else {
                log::warn!("localStorage unavailable; token not persisted");
                return;
            };
            if storage.set_item(TOKEN_STORAGE_KEY, token).is_err() {
                log::warn!("failed to persist token");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
        }
    }

    fn read(&self) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .get_item(TOKEN_STORAGE_KEY)
                .ok()
                .flatten()
                .filter(|t| !t.is_empty())
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn clear(&self) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(TOKEN_STORAGE_KEY);
            }
        }
    }
}

/// Process-local store for tests and non-browser builds.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RefCell<Option<String>>,
}

impl MemoryCredentials {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: RefCell::new(Some(token.to_owned())) }
    }
}

impl CredentialStore for MemoryCredentials {
    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_owned());
    }

    fn read(&self) -> Option<String> {
        self.token.borrow().clone().filter(|t| !t.is_empty())
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}
