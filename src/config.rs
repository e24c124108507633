//! Client configuration resolved from the build environment.
//!
//! The browser has no process environment, so `TRIMLY_API_URL` is captured
//! at compile time.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin (and optional prefix) prepended to every `/api/...` path.
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_raw(None)
    }
}

impl ClientConfig {
    /// Build config from `TRIMLY_API_URL` as seen by the compiler.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_raw(option_env!("TRIMLY_API_URL"))
    }

    /// Build config from an optional raw base URL. Blank values fall back to
    /// [`DEFAULT_API_BASE_URL`]; trailing slashes are trimmed.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let base = raw
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self { api_base_url: base }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
