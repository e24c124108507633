//! Clipboard, QR download and "open link" browser glue.
//!
//! The copy path prefers the async Clipboard API and falls back to a hidden
//! `<textarea>` plus `execCommand("copy")` when the API is missing or
//! refuses. Both paths end in the same [`CopyAck`] flash.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

#[cfg(feature = "csr")]
use wasm_bindgen::JsCast as _;

/// How long the "Copied!" acknowledgement stays visible.
pub const COPY_RESET_MS: u32 = 2_000;

/// Transient "copied" marker for one link at a time.
///
/// Each copy bumps `ticket`; a reset only applies if no newer copy happened
/// since, so rapid copies never clear each other's acknowledgement early.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyAck {
    pub copied_id: Option<String>,
    pub ticket: u64,
}

impl CopyAck {
    /// Mark `id` as copied and return the ticket that will expire it.
    pub fn mark(&mut self, id: &str) -> u64 {
        self.ticket += 1;
        self.copied_id = Some(id.to_owned());
        self.ticket
    }

    /// Clear the marker if `ticket` is still the latest.
    pub fn expire(&mut self, ticket: u64) {
        if self.ticket == ticket {
            self.copied_id = None;
        }
    }

    #[must_use]
    pub fn is_copied(&self, id: &str) -> bool {
        self.copied_id.as_deref() == Some(id)
    }
}

/// File name used when saving a link's QR code.
#[must_use]
pub fn qr_file_name(link_id: &str) -> String {
    format!("qr-{link_id}.png")
}

/// Copy `text` to the clipboard.
///
/// # Errors
///
/// Returns a message when both the Clipboard API and the selection fallback
/// fail.
#[cfg(feature = "csr")]
pub async fn copy_text(text: &str) -> Result<(), String> {
    if let Some(clipboard) = async_clipboard() {
        match wasm_bindgen_futures::JsFuture::from(clipboard.write_text(text)).await {
            Ok(_) => return Ok(()),
            Err(e) => log::debug!("clipboard: async write refused ({e:?}); using fallback"),
        }
    }
    copy_with_selection(text)
}

#[cfg(not(feature = "csr"))]
#[allow(clippy::unused_async)]
pub async fn copy_text(_text: &str) -> Result<(), String> {
    Err("Clipboard is only available in the browser".to_owned())
}

#[cfg(feature = "csr")]
fn async_clipboard() -> Option<web_sys::Clipboard> {
    let navigator = web_sys::window()?.navigator();
    js_sys::Reflect::get(&navigator, &"clipboard".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| v.dyn_into::<web_sys::Clipboard>().ok())
}

#[cfg(feature = "csr")]
fn copy_with_selection(text: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "No document".to_owned())?;
    let body = document.body().ok_or_else(|| "No document body".to_owned())?;
    let area = document
        .create_element("textarea")
        .ok()
        .and_then(|el| el.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        .ok_or_else(|| "Unable to create textarea".to_owned())?;
    area.set_value(text);
    let _ = area.set_attribute("readonly", "");
    let _ = area.set_attribute("style", "position:fixed;top:-1000px;opacity:0");
    body.append_child(&area).map_err(|e| format!("{e:?}"))?;
    area.select();
    let copied = document
        .dyn_ref::<web_sys::HtmlDocument>()
        .and_then(|d| d.exec_command("copy").ok())
        .unwrap_or(false);
    let _ = body.remove_child(&area);
    if copied {
        Ok(())
    } else {
        log::warn!("clipboard: selection fallback failed");
        Err("Copy failed".to_owned())
    }
}

/// Save a QR `data:` URL as `qr-<id>.png` via a temporary anchor.
#[cfg(feature = "csr")]
pub fn download_qr(link_id: &str, data_url: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(anchor) = document
        .create_element("a")
        .ok()
        .and_then(|el| el.dyn_into::<web_sys::HtmlAnchorElement>().ok())
    else {
        return;
    };
    anchor.set_href(data_url);
    anchor.set_download(&qr_file_name(link_id));
    let Some(body) = document.body() else {
        return;
    };
    if body.append_child(&anchor).is_ok() {
        anchor.click();
        let _ = body.remove_child(&anchor);
    }
}

#[cfg(not(feature = "csr"))]
pub fn download_qr(_link_id: &str, _data_url: &str) {}

/// Open `url` in a new browser tab.
#[cfg(feature = "csr")]
pub fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

#[cfg(not(feature = "csr"))]
pub fn open_in_new_tab(_url: &str) {}
