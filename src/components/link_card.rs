//! One row of the link history on the dashboard.
//!
//! DESIGN
//! ======
//! The card is presentational: copy, open, QR and delete are reported to the
//! dashboard through callbacks, which owns the service calls.

#[cfg(test)]
#[path = "link_card_test.rs"]
mod link_card_test;

use leptos::prelude::*;

use crate::state::links::Link;
use crate::util::clipboard::CopyAck;

/// Longest original URL shown before eliding the middle.
pub const MAX_URL_DISPLAY: usize = 60;

/// Shorten `url` for display, keeping the head and tail.
pub fn elide_url(url: &str, max: usize) -> String {
    let count = url.chars().count();
    if count <= max || max < 5 {
        return url.to_owned();
    }
    let keep = max - 3;
    let head = keep.div_ceil(2);
    let tail = keep - head;
    let start: String = url.chars().take(head).collect();
    let end: String = url.chars().skip(count - tail).collect();
    format!("{start}...{end}")
}

/// Click count label with singular/plural wording.
pub fn clicks_label(count: u64) -> String {
    if count == 1 { "1 click".to_owned() } else { format!("{count} clicks") }
}

#[component]
pub fn LinkCard(
    link: Link,
    copy_ack: RwSignal<CopyAck>,
    on_copy: Callback<Link>,
    on_open: Callback<String>,
    on_qr: Callback<Link>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let id = link.id.clone();
    let copied = {
        let id = id.clone();
        move || copy_ack.get().is_copied(&id)
    };
    let title = link.title.clone();
    let has_qr = link.qr_image.is_some();
    let short_href = link.short_url.clone();
    let short_text = link.short_url.clone();
    let open_url = link.short_url.clone();
    let display_url = elide_url(&link.original_url, MAX_URL_DISPLAY);
    let copy_link = link.clone();
    let qr_link = link.clone();
    let delete_id = id.clone();

    view! {
        <li class="link-card" class:link-card--inactive=!link.active>
            {title.map(|t| view! { <span class="link-card__title">{t}</span> })}
            <a class="link-card__short" href=short_href target="_blank" rel="noopener noreferrer">
                {short_text}
            </a>
            <span class="link-card__original" title=link.original_url.clone()>{display_url}</span>
            <span class="link-card__meta">
                <span class="link-card__clicks">{clicks_label(link.click_count)}</span>
                <span class="link-card__age">{link.age.clone()}</span>
            </span>
            <div class="link-card__actions">
                <button class="btn link-card__copy" on:click=move |_| on_copy.run(copy_link.clone())>
                    {move || if copied() { "Copied!" } else { "Copy" }}
                </button>
                <button class="btn link-card__open" on:click=move |_| on_open.run(open_url.clone())>
                    "Open"
                </button>
                <Show when=move || has_qr>
                    <button
                        class="btn link-card__qr"
                        on:click={
                            let qr_link = qr_link.clone();
                            move |_| on_qr.run(qr_link.clone())
                        }
                    >
                        "QR"
                    </button>
                </Show>
                <button
                    class="btn btn--danger link-card__delete"
                    on:click=move |_| on_delete.run(delete_id.clone())
                    title="Delete link"
                    aria-label="Delete link"
                >
                    "✕"
                </button>
            </div>
        </li>
    }
}
