//! HTTP seam between the API transport and the browser fetch stack.
//!
//! DESIGN
//! ======
//! The transport only ever sees `HttpRequest`/`HttpResponse`. In the browser
//! `GlooBackend` performs real requests via `gloo-net`; tests plug in an
//! in-memory backend. Futures are `?Send` because the browser event loop is
//! single-threaded.

use async_trait::async_trait;

/// HTTP verbs used by the REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully resolved outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    /// Look up a header by case-insensitive name.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status plus raw body text of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single request. Implementations report only transport-level
/// failures as `Err`; any HTTP status, including errors, is `Ok`.
#[async_trait(?Send)]
pub trait HttpBackend {
    /// # Errors
    ///
    /// Returns a description of the network failure when no response arrived.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

/// Browser `fetch` backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooBackend;

#[async_trait(?Send)]
impl HttpBackend for GlooBackend {
    #[allow(clippy::unused_async)]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;

            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
                Method::Put => Request::put(&request.url),
                Method::Delete => Request::delete(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let built = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| e.to_string())?;
            let resp = built.send().await.map_err(|e| e.to_string())?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(HttpResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err("not available outside the browser".to_owned())
        }
    }
}
