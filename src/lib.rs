//! Trimly browser client.
//!
//! ARCHITECTURE
//! ============
//! `net` talks to the link-shortener REST API, `state` holds the session and
//! link-history models, `util` isolates browser glue, and `pages` /
//! `components` render the Leptos UI. Everything outside the `csr` feature
//! gates compiles natively so the session and link logic is unit tested
//! without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic/log hooks and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
