//! The single HTTP path every API call flows through.
//!
//! ARCHITECTURE
//! ============
//! Outbound, the transport reads the credential store and attaches
//! `Authorization: Bearer <token>` when a token exists. Inbound, a 401 from
//! any endpoint clears the store and fires [`InvalidationSignal`]; the session
//! controller subscribes to that signal and the presentation layer decides
//! where to navigate. The transport never writes a token.
//!
//! ERROR HANDLING
//! ==============
//! Network failures and non-2xx statuses become [`ApiError`]. Rejections carry
//! the server's `message` when the body has one, otherwise a status message.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::de::DeserializeOwned;

use super::http::{HttpBackend, HttpRequest, HttpResponse, Method};
use super::types::ErrorBody;
use crate::config::ClientConfig;
use crate::util::credentials::CredentialStore;

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response arrived (offline, DNS, CORS, aborted).
    #[error("Unable to reach the server. Please try again.")]
    Network(String),

    /// 401. The session has already been invalidated by the time a caller
    /// sees this; the message is the server's, or a session-expired default.
    #[error("{0}")]
    Unauthorized(String),

    /// Any other non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A 2xx body did not match the expected schema.
    #[error("Unexpected response from server")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// The message the server put in the error body, if it sent one.
    #[must_use]
    pub fn reported_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { status, message } if *message != status_failed_message(*status) => Some(message),
            Self::Unauthorized(message) if message != SESSION_EXPIRED_MESSAGE => Some(message),
            _ => None,
        }
    }
}

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

pub(crate) fn status_failed_message(status: u16) -> String {
    format!("Request failed with status code {status}")
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
}

/// Extract a human-readable message from an error response body.
pub(crate) fn rejection_message(status: u16, body: &str) -> String {
    server_message(body).unwrap_or_else(|| status_failed_message(status))
}

struct InvalidationInner {
    epoch: Cell<u64>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

/// Broadcast fired whenever the server rejects the current token.
///
/// The epoch increases by one per emission so in-flight operations can tell
/// whether an invalidation happened while they were suspended.
#[derive(Clone)]
pub struct InvalidationSignal {
    inner: Rc<InvalidationInner>,
}

impl Default for InvalidationSignal {
    fn default() -> Self {
        Self {
            inner: Rc::new(InvalidationInner { epoch: Cell::new(0), listeners: RefCell::new(Vec::new()) }),
        }
    }
}

impl InvalidationSignal {
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.get()
    }

    pub fn emit(&self) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
        // Snapshot so listeners may subscribe/emit without a live borrow.
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

/// Configured API client shared by the session controller and link manager.
pub struct ApiTransport {
    base_url: String,
    backend: Rc<dyn HttpBackend>,
    store: Rc<dyn CredentialStore>,
    invalidation: InvalidationSignal,
}

impl ApiTransport {
    #[must_use]
    pub fn new(config: &ClientConfig, backend: Rc<dyn HttpBackend>, store: Rc<dyn CredentialStore>) -> Self {
        Self { base_url: config.api_base_url.clone(), backend, store, invalidation: InvalidationSignal::default() }
    }

    #[must_use]
    pub fn invalidation(&self) -> &InvalidationSignal {
        &self.invalidation
    }

    /// The credential store shared with the session controller.
    #[must_use]
    pub fn store(&self) -> &Rc<dyn CredentialStore> {
        &self.store
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and decode a JSON success body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let resp = self.exchange(method, path, body).await?;
        serde_json::from_str(&resp.body).map_err(|e| {
            log::warn!("{} {path}: undecodable body: {e}", method.as_str());
            ApiError::Decode(e.to_string())
        })
    }

    /// Send a request whose success body is an acknowledgement to ignore.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn request_ack(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.exchange(method, path, body).await.map(|_| ())
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ApiError> {
        let mut req = HttpRequest::new(method, self.url(path));
        req.headers.push(("Accept".to_owned(), "application/json".to_owned()));
        let sent_token = self.store.read();
        if let Some(token) = &sent_token {
            req.headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        req.body = body;

        let resp = self.backend.send(req).await.map_err(|e| {
            log::warn!("{} {path}: network failure: {e}", method.as_str());
            ApiError::Network(e)
        })?;

        if resp.status == 401 {
            // Only the token this request carried is known to be bad; a token
            // saved while it was in flight belongs to a newer session.
            if self.store.read() == sent_token {
                log::info!("{} {path}: token rejected, invalidating session", method.as_str());
                self.store.clear();
                self.invalidation.emit();
            } else {
                log::debug!("{} {path}: 401 for a replaced token ignored", method.as_str());
            }
            let message = server_message(&resp.body).unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_owned());
            return Err(ApiError::Unauthorized(message));
        }
        if !resp.is_success() {
            let message = rejection_message(resp.status, &resp.body);
            log::debug!("{} {path}: {} {message}", method.as_str(), resp.status);
            return Err(ApiError::Rejected { status: resp.status, message });
        }
        Ok(resp)
    }
}
