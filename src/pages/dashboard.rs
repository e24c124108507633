//! Dashboard page: shorten form, link history, QR preview and account menu.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered only inside `ProtectedRoute`, so the session is authenticated on
//! mount. The page loads the link history and stats once, then drives every
//! mutation through the shared `LinkCollection`; the rendered list follows the
//! collection's `RwSignal<LinksState>` mirror.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::app::Services;
use crate::components::delete_account_modal::DeleteAccountModal;
use crate::components::link_card::LinkCard;
use crate::components::qr_modal::QrModal;
use crate::net::types::LinkStats;
use crate::state::account::DeleteAccountFlow;
use crate::state::auth::AuthState;
use crate::state::links::{Link, LinksState};
use crate::util::clipboard::{CopyAck, copy_text, open_in_new_tab};

/// Single uppercase letter for the avatar bubble.
pub fn avatar_initial(username: &str) -> String {
    username
        .trim()
        .chars()
        .next()
        .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect())
}

/// Stats shown in the header: server totals when fetched, otherwise derived
/// from the loaded history.
pub fn effective_stats(state: &LinksState) -> LinkStats {
    state.stats.clone().unwrap_or_else(|| LinkStats {
        total_urls: state.items.len() as u64,
        total_clicks: state.items.iter().map(|l| l.click_count).sum(),
        active_urls: state.items.iter().filter(|l| l.active).count() as u64,
    })
}

/// Show the "Copied!" acknowledgement for `id`, then clear it unless a newer
/// copy replaced it.
fn flash_copied(copy_ack: RwSignal<CopyAck>, id: &str) {
    let mut ticket = 0;
    copy_ack.update(|ack| ticket = ack.mark(id));
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(crate::util::clipboard::COPY_RESET_MS).await;
        copy_ack.update(|ack| ack.expire(ticket));
    });
    #[cfg(not(feature = "csr"))]
    let _ = ticket;
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let services = expect_context::<Services>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let links = expect_context::<RwSignal<LinksState>>();

    let copy_ack = RwSignal::new(CopyAck::default());
    let qr_link = RwSignal::new(None::<Link>);
    let profile_open = RwSignal::new(false);
    let delete_flow = RwSignal::new(DeleteAccountFlow::default());

    {
        let collection = services.get_value().links;
        leptos::task::spawn_local(async move {
            if collection.load().await.is_ok() {
                let _ = collection.refresh_stats().await;
            }
        });
    }

    let on_shorten = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let state = links.get_untracked();
        if state.create_pending {
            return;
        }
        let collection = services.get_value().links;
        leptos::task::spawn_local(async move {
            if collection.create(&state.input).await.is_ok() {
                let _ = collection.refresh_stats().await;
            }
        });
    };

    let on_copy = Callback::new(move |link: Link| {
        leptos::task::spawn_local(async move {
            match copy_text(&link.short_url).await {
                Ok(()) => flash_copied(copy_ack, &link.id),
                Err(e) => log::warn!("dashboard: copy failed: {e}"),
            }
        });
    });

    let on_open = Callback::new(move |url: String| open_in_new_tab(&url));
    let on_qr = Callback::new(move |link: Link| qr_link.set(Some(link)));
    let on_qr_close = Callback::new(move |()| qr_link.set(None));

    let on_delete = Callback::new(move |id: String| {
        let collection = services.get_value().links;
        leptos::task::spawn_local(async move {
            if collection.delete(&id).await.is_ok() {
                let _ = collection.refresh_stats().await;
            }
        });
    });

    // The route guard takes over once the session is anonymous.
    let on_logout = move |_: leptos::ev::MouseEvent| {
        profile_open.set(false);
        services.get_value().session.logout();
    };

    let username = move || auth.get().user.map(|u| u.username).unwrap_or_default();
    let email = move || auth.get().user.map(|u| u.email).unwrap_or_default();
    let stats = move || effective_stats(&links.get());

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header toolbar">
                <span class="toolbar__brand">"Trimly"</span>
                <span class="toolbar__spacer"></span>
                <div class="profile-menu">
                    <button
                        class="profile-menu__avatar"
                        title="Account"
                        on:click=move |_| profile_open.update(|v| *v = !*v)
                    >
                        {move || avatar_initial(&username())}
                    </button>
                    <Show when=move || profile_open.get()>
                        <div class="profile-menu__panel" on:mouseleave=move |_| profile_open.set(false)>
                            <p class="profile-menu__name">{username}</p>
                            <p class="profile-menu__email">{email}</p>
                            <button class="btn profile-menu__logout" on:click=on_logout>
                                "Logout"
                            </button>
                            <button
                                class="btn btn--danger profile-menu__delete"
                                on:click=move |_| {
                                    profile_open.set(false);
                                    delete_flow.update(DeleteAccountFlow::open);
                                }
                            >
                                "Delete account"
                            </button>
                        </div>
                    </Show>
                </div>
            </header>

            <section class="dashboard-page__stats">
                <div class="stat">
                    <span class="stat__value">{move || stats().total_urls}</span>
                    <span class="stat__label">"Links"</span>
                </div>
                <div class="stat">
                    <span class="stat__value">{move || stats().total_clicks}</span>
                    <span class="stat__label">"Clicks"</span>
                </div>
                <div class="stat">
                    <span class="stat__value">{move || stats().active_urls}</span>
                    <span class="stat__label">"Active"</span>
                </div>
            </section>

            <form class="shorten-form" on:submit=on_shorten>
                <input
                    class="shorten-form__input"
                    type="url"
                    placeholder="Paste a long URL"
                    prop:value=move || links.get().input
                    on:input=move |ev| services.get_value().links.set_input(&event_target_value(&ev))
                />
                <button
                    class="btn btn--primary shorten-form__submit"
                    type="submit"
                    disabled=move || links.get().create_pending
                >
                    {move || if links.get().create_pending { "Shortening..." } else { "Shorten" }}
                </button>
            </form>

            <Show when=move || links.get().error.is_some()>
                <p class="dashboard-page__error" role="alert">
                    {move || links.get().error.unwrap_or_default()}
                    <button
                        class="dashboard-page__error-dismiss"
                        aria-label="Dismiss"
                        on:click=move |_| services.get_value().links.dismiss_error()
                    >
                        "✕"
                    </button>
                </p>
            </Show>

            <section class="dashboard-page__history">
                <h2>"Your links"</h2>
                <Show
                    when=move || !(links.get().loading && links.get().items.is_empty())
                    fallback=move || view! { <p class="dashboard-page__loading">"Loading links..."</p> }
                >
                    <Show
                        when=move || !links.get().items.is_empty()
                        fallback=move || {
                            view! {
                                <p class="dashboard-page__empty">"No links yet. Shorten your first URL above."</p>
                            }
                        }
                    >
                        <ul class="dashboard-page__links">
                            <For
                                each=move || links.get().items
                                key=|link| (link.id.clone(), link.click_count, link.title.clone(), link.active)
                                children=move |link| {
                                    view! {
                                        <LinkCard
                                            link=link
                                            copy_ack=copy_ack
                                            on_copy=on_copy
                                            on_open=on_open
                                            on_qr=on_qr
                                            on_delete=on_delete
                                        />
                                    }
                                }
                            />
                        </ul>
                    </Show>
                </Show>
            </section>

            {move || qr_link.get().map(|link| view! { <QrModal link=link on_close=on_qr_close /> })}
            <DeleteAccountModal flow=delete_flow />
        </div>
    }
}
