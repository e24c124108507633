//! Shared wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types mirror the link-shortener REST payloads (camelCase JSON,
//! Mongo-style `_id`) so the transport can stay schema-driven. UI-facing
//! shapes live in `state`; conversion happens there.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An authenticated user as returned by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, when the server includes it.
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    /// Display name chosen at signup.
    pub username: String,
    /// Login email address.
    pub email: String,
}

/// Body of a successful `login` or `signup` call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body of `GET /api/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountRequest<'a> {
    pub password: &'a str,
}

/// A shortened link exactly as the server stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// The long URL that was shortened.
    pub original_url: String,
    /// Fully qualified short URL.
    pub short_url: String,
    /// Short code component of `short_url`, if the server sends it.
    #[serde(default)]
    pub short_code: Option<String>,
    /// Total redirects served for this link.
    #[serde(default)]
    pub clicks: u64,
    /// Creation time (RFC 3339).
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Pre-rendered QR code as a `data:` URL.
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /api/urls`. Empty optional fields are omitted.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<String>,
}

impl CreateLinkRequest {
    /// Build a create request, dropping blank `title`/`custom_code` values.
    #[must_use]
    pub fn new(original_url: &str, title: Option<&str>, custom_code: Option<&str>) -> Self {
        let non_blank = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);
        Self {
            original_url: original_url.trim().to_owned(),
            title: non_blank(title),
            custom_code: non_blank(custom_code),
        }
    }
}

/// Partial update for `PUT /api/urls/:id`. Only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateLinkRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.title.is_none() && self.is_active.is_none()
    }
}

/// Aggregate numbers from `GET /api/urls/stats`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    #[serde(default)]
    pub total_urls: u64,
    #[serde(default)]
    pub total_clicks: u64,
    #[serde(default)]
    pub active_urls: u64,
}

/// Error payload shape shared by every endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
