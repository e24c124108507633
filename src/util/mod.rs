//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic so the session and link logic stays testable off the browser.

pub mod age;
pub mod auth;
pub mod clipboard;
pub mod credentials;
