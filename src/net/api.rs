//! Typed REST endpoint helpers for the auth and URL APIs.
//!
//! Every call goes through [`ApiTransport`], so bearer injection and 401
//! invalidation apply uniformly. Helpers return `ApiError`; the session
//! controller and link manager turn those into display messages.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::http::Method;
use super::transport::{ApiError, ApiTransport};
use super::types::{
    AuthResponse, CreateLinkRequest, DeleteAccountRequest, LinkRecord, LinkStats, LoginRequest, MeResponse,
    SignupRequest, UpdateLinkRequest, User,
};

pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const ME_PATH: &str = "/api/auth/me";
pub const ACCOUNT_PATH: &str = "/api/auth/account";
pub const URLS_PATH: &str = "/api/urls";
pub const URL_STATS_PATH: &str = "/api/urls/stats";

pub(crate) fn url_endpoint(id: &str) -> String {
    format!("{URLS_PATH}/{id}")
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `POST /api/auth/signup`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn signup(api: &ApiTransport, username: &str, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let body = to_json(&SignupRequest { username, email, password })?;
    api.request(Method::Post, SIGNUP_PATH, Some(body)).await
}

/// `POST /api/auth/login`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn login(api: &ApiTransport, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let body = to_json(&LoginRequest { email, password })?;
    api.request(Method::Post, LOGIN_PATH, Some(body)).await
}

/// `GET /api/auth/me` using whatever token the store holds.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn fetch_current_user(api: &ApiTransport) -> Result<User, ApiError> {
    let resp: MeResponse = api.request(Method::Get, ME_PATH, None).await?;
    Ok(resp.user)
}

/// `DELETE /api/auth/account` with the re-entered password.
///
/// # Errors
///
/// Returns the transport or server failure (e.g. wrong password).
pub async fn delete_account(api: &ApiTransport, password: &str) -> Result<(), ApiError> {
    let body = to_json(&DeleteAccountRequest { password })?;
    api.request_ack(Method::Delete, ACCOUNT_PATH, Some(body)).await
}

/// `GET /api/urls`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn list_links(api: &ApiTransport) -> Result<Vec<LinkRecord>, ApiError> {
    api.request(Method::Get, URLS_PATH, None).await
}

/// `GET /api/urls/:id`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn fetch_link(api: &ApiTransport, id: &str) -> Result<LinkRecord, ApiError> {
    api.request(Method::Get, &url_endpoint(id), None).await
}

/// `POST /api/urls`.
///
/// # Errors
///
/// Returns the transport or server failure (e.g. custom code taken).
pub async fn create_link(api: &ApiTransport, request: &CreateLinkRequest) -> Result<LinkRecord, ApiError> {
    api.request(Method::Post, URLS_PATH, Some(to_json(request)?)).await
}

/// `PUT /api/urls/:id`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn update_link(api: &ApiTransport, id: &str, patch: &UpdateLinkRequest) -> Result<LinkRecord, ApiError> {
    api.request(Method::Put, &url_endpoint(id), Some(to_json(patch)?)).await
}

/// `DELETE /api/urls/:id`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn delete_link(api: &ApiTransport, id: &str) -> Result<(), ApiError> {
    api.request_ack(Method::Delete, &url_endpoint(id), None).await
}

/// `GET /api/urls/stats`.
///
/// # Errors
///
/// Returns the transport or server failure.
pub async fn fetch_stats(api: &ApiTransport) -> Result<LinkStats, ApiError> {
    api.request(Method::Get, URL_STATS_PATH, None).await
}
