//! Modal previewing a link's QR code with a PNG download action.

use leptos::prelude::*;

use crate::state::links::Link;
use crate::util::clipboard::{download_qr, qr_file_name};

#[component]
pub fn QrModal(link: Link, on_close: Callback<()>) -> impl IntoView {
    let image = link.qr_image.clone().unwrap_or_default();
    let download_image = image.clone();
    let id = link.id.clone();
    let file_name = qr_file_name(&link.id);

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            on_close.run(());
        }
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_close.run(())>
            <div
                class="dialog dialog--qr"
                on:click=move |ev| ev.stop_propagation()
                on:keydown=on_keydown
                tabindex="0"
            >
                <h2>"QR Code"</h2>
                <img class="dialog__qr-image" src=image alt="QR code for short link" />
                <p class="dialog__qr-url">{link.short_url.clone()}</p>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_close.run(())>
                        "Close"
                    </button>
                    <button
                        class="btn btn--primary"
                        title=file_name
                        on:click=move |_| download_qr(&id, &download_image)
                    >
                        "Download PNG"
                    </button>
                </div>
            </div>
        </div>
    }
}
