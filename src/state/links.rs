//! Link-history state and the manager that keeps it in sync with the API.
//!
//! DESIGN
//! ======
//! The collection is a derived cache of `GET /api/urls`, newest first.
//! Create waits for the server record and then prepends it; delete sends the
//! request and removes the row only once the server confirms, so the list
//! never shows a link the server failed to create or failed to delete.
//!
//! Operations assume the caller has already gated on an authenticated
//! session. When attached to a [`SessionController`], the cache is dropped on
//! every transition out of the authenticated state. Clearing bumps a cache
//! epoch; an operation that started under an older epoch drops its result.

#[cfg(test)]
#[path = "links_test.rs"]
mod links_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use time::OffsetDateTime;

use super::session::SessionController;
use crate::net::api;
use crate::net::transport::{ApiTransport, SESSION_EXPIRED_MESSAGE};
use crate::net::types::{CreateLinkRequest, LinkRecord, LinkStats, UpdateLinkRequest};
use crate::util::age::{JUST_NOW, age_label};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load your links";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete link";
pub const EMPTY_URL_MESSAGE: &str = "Enter a URL to shorten.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to shorten URL";

/// A shortened link as displayed in the history list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub click_count: u64,
    pub created_at: Option<OffsetDateTime>,
    /// Relative age computed when the row was last loaded.
    pub age: String,
    /// QR code `data:` URL, when the server rendered one.
    pub qr_image: Option<String>,
    pub title: Option<String>,
    pub active: bool,
}

impl Link {
    #[must_use]
    pub fn from_record(record: LinkRecord, now: OffsetDateTime) -> Self {
        let age = record.created_at.map_or_else(String::new, |at| age_label(at, now));
        Self {
            id: record.id,
            original_url: record.original_url,
            short_url: record.short_url,
            click_count: record.clicks,
            created_at: record.created_at,
            age,
            qr_image: record.qr_code,
            title: record.title,
            active: record.is_active,
        }
    }
}

/// Snapshot of the history list and its in-flight flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinksState {
    pub items: Vec<Link>,
    pub loading: bool,
    pub create_pending: bool,
    /// Draft URL in the shorten form; cleared after a successful create.
    pub input: String,
    pub error: Option<String>,
    pub stats: Option<LinkStats>,
}

impl LinksState {
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|l| l.id == id)
    }

    /// Insert at the head, replacing any stale row with the same id.
    pub fn prepend(&mut self, link: Link) {
        self.items.retain(|l| l.id != link.id);
        self.items.insert(0, link);
    }

    /// Remove by id. Returns whether a row was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.id != id);
        self.items.len() != before
    }

    /// Replace the row with the same id in place. Returns whether it existed.
    pub fn replace(&mut self, link: Link) -> bool {
        match self.items.iter_mut().find(|l| l.id == link.id) {
            Some(slot) => {
                *slot = link;
                true
            }
            None => false,
        }
    }
}

type Listener = Rc<dyn Fn(&LinksState)>;
type Clock = Box<dyn Fn() -> OffsetDateTime>;

struct LinksInner {
    api: Rc<ApiTransport>,
    state: RefCell<LinksState>,
    clock: Clock,
    listeners: RefCell<Vec<Listener>>,
    epoch: Cell<u64>,
}

/// Cheaply cloneable handle to the link collection.
#[derive(Clone)]
pub struct LinkCollection {
    inner: Rc<LinksInner>,
}

impl LinkCollection {
    #[must_use]
    pub fn new(api: Rc<ApiTransport>) -> Self {
        Self::with_clock(api, Box::new(OffsetDateTime::now_utc))
    }

    #[must_use]
    pub fn with_clock(api: Rc<ApiTransport>, clock: Clock) -> Self {
        Self {
            inner: Rc::new(LinksInner {
                api,
                state: RefCell::new(LinksState::default()),
                clock,
                listeners: RefCell::new(Vec::new()),
                epoch: Cell::new(0),
            }),
        }
    }

    /// Drop the cache whenever the session stops being authenticated.
    pub fn attach(&self, session: &SessionController) {
        let weak: Weak<LinksInner> = Rc::downgrade(&self.inner);
        session.subscribe(move |state, change| {
            if state.is_authenticated() {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                log::debug!("links: discarding cache after {change:?}");
                LinkCollection { inner }.clear();
            }
        });
    }

    #[must_use]
    pub fn state(&self) -> LinksState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&LinksState) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn set_input(&self, value: &str) {
        self.update(|s| s.input = value.to_owned());
    }

    pub fn dismiss_error(&self) {
        self.update(|s| s.error = None);
    }

    pub fn clear(&self) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
        self.update(|s| *s = LinksState::default());
    }

    /// Replace the whole collection with the server's list.
    ///
    /// # Errors
    ///
    /// On failure the previous items stay in place and the error is recorded.
    pub async fn load(&self) -> Result<(), String> {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let epoch = self.inner.epoch.get();
        let result = api::list_links(&self.inner.api).await;
        self.ensure_current(epoch, "load")?;
        match result {
            Ok(records) => {
                let now = (self.inner.clock)();
                let items: Vec<Link> = records.into_iter().map(|r| Link::from_record(r, now)).collect();
                log::debug!("links: loaded {}", items.len());
                self.update(|s| {
                    s.items = items;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                log::warn!("links: load failed: {e}");
                self.fail(|s| s.loading = false, LOAD_FAILED_MESSAGE.to_owned())
            }
        }
    }

    /// Shorten `raw_url` with no title or custom code.
    ///
    /// # Errors
    ///
    /// See [`Self::create_with`].
    pub async fn create(&self, raw_url: &str) -> Result<Link, String> {
        self.create_with(raw_url, None, None).await
    }

    /// Shorten a URL and prepend the server's record.
    ///
    /// # Errors
    ///
    /// Returns a message for blank input (no request is sent) or for a
    /// server/transport failure; the collection is unchanged in both cases.
    pub async fn create_with(
        &self,
        raw_url: &str,
        title: Option<&str>,
        custom_code: Option<&str>,
    ) -> Result<Link, String> {
        if raw_url.trim().is_empty() {
            return Err(EMPTY_URL_MESSAGE.to_owned());
        }
        let request = CreateLinkRequest::new(raw_url, title, custom_code);
        self.update(|s| {
            s.create_pending = true;
            s.error = None;
        });
        let epoch = self.inner.epoch.get();
        let result = api::create_link(&self.inner.api, &request).await;
        self.ensure_current(epoch, "create")?;
        match result {
            Ok(record) => {
                let mut link = Link::from_record(record, (self.inner.clock)());
                link.age = JUST_NOW.to_owned();
                log::info!("links: created {}", link.short_url);
                self.update(|s| {
                    s.prepend(link.clone());
                    s.input.clear();
                    s.create_pending = false;
                });
                Ok(link)
            }
            Err(e) => {
                log::info!("links: create failed: {e}");
                let message = e.reported_message().unwrap_or(CREATE_FAILED_MESSAGE).to_owned();
                self.fail(|s| s.create_pending = false, message)
            }
        }
    }

    /// Delete on the server, then remove locally.
    ///
    /// Deleting an id that is no longer in the collection is a local no-op,
    /// and a 404 from the server is treated as already deleted, so repeated
    /// or racing deletes converge on the same list.
    ///
    /// # Errors
    ///
    /// Returns a message when the server refuses; the row stays visible.
    pub async fn delete(&self, id: &str) -> Result<(), String> {
        if !self.inner.state.borrow().contains(id) {
            log::debug!("links: delete of unknown id {id} ignored");
            return Ok(());
        }
        let epoch = self.inner.epoch.get();
        let result = api::delete_link(&self.inner.api, id).await;
        self.ensure_current(epoch, "delete")?;
        match result {
            Err(e) if e.status() != Some(404) => {
                log::warn!("links: delete {id} failed: {e}");
                self.fail(|_| {}, DELETE_FAILED_MESSAGE.to_owned())
            }
            _ => {
                self.update(|s| {
                    s.remove(id);
                });
                Ok(())
            }
        }
    }

    /// Apply a partial update and swap the row in place.
    ///
    /// # Errors
    ///
    /// Returns a message for an empty patch or a server/transport failure.
    pub async fn update_link(&self, id: &str, patch: &UpdateLinkRequest) -> Result<Link, String> {
        if patch.is_empty() {
            return Err("Nothing to update.".to_owned());
        }
        let epoch = self.inner.epoch.get();
        let result = api::update_link(&self.inner.api, id, patch).await;
        self.ensure_current(epoch, "update")?;
        match result {
            Ok(record) => {
                let link = Link::from_record(record, (self.inner.clock)());
                self.update(|s| {
                    s.replace(link.clone());
                });
                Ok(link)
            }
            Err(e) => {
                log::info!("links: update {id} failed: {e}");
                self.fail(|_| {}, e.to_string())
            }
        }
    }

    /// Fetch aggregate stats into the state.
    ///
    /// # Errors
    ///
    /// Returns a message on failure; previous stats are kept.
    pub async fn refresh_stats(&self) -> Result<LinkStats, String> {
        let epoch = self.inner.epoch.get();
        let result = api::fetch_stats(&self.inner.api).await;
        self.ensure_current(epoch, "stats")?;
        match result {
            Ok(stats) => {
                self.update(|s| s.stats = Some(stats.clone()));
                Ok(stats)
            }
            Err(e) => {
                log::info!("links: stats failed: {e}");
                self.fail(|_| {}, e.to_string())
            }
        }
    }

    /// Refuse a result whose request started before the last `clear`.
    fn ensure_current(&self, epoch: u64, op: &str) -> Result<(), String> {
        if self.inner.epoch.get() == epoch {
            return Ok(());
        }
        log::debug!("links: {op} result dropped, cache was cleared");
        Err(SESSION_EXPIRED_MESSAGE.to_owned())
    }

    fn fail<T>(&self, reset: impl FnOnce(&mut LinksState), message: String) -> Result<T, String> {
        self.update(|s| {
            reset(s);
            s.error = Some(message.clone());
        });
        Err(message)
    }

    fn update(&self, apply: impl FnOnce(&mut LinksState)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            apply(&mut state);
            state.clone()
        };
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
