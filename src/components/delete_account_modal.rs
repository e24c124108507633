//! Two-step account deletion dialog.
//!
//! The first step warns; the second asks for the password again. The
//! destructive call runs through the session controller, which tears the
//! session down on success.

use leptos::prelude::*;

use crate::app::Services;
use crate::state::account::DeleteAccountFlow;

#[component]
pub fn DeleteAccountModal(flow: RwSignal<DeleteAccountFlow>) -> impl IntoView {
    let services = expect_context::<Services>();
    let close = move |_: leptos::ev::MouseEvent| flow.update(DeleteAccountFlow::close);

    let submit = Callback::new(move |()| {
        let mut password = None;
        flow.update(|f| password = f.begin_submit());
        let Some(password) = password else {
            return;
        };
        let session = services.get_value().session;
        leptos::task::spawn_local(async move {
            let result = session.delete_account(&password).await;
            flow.update(|f| f.finish(result));
        });
    });

    let pending = move || matches!(flow.get(), DeleteAccountFlow::Confirm { pending: true, .. });
    let error = move || match flow.get() {
        DeleteAccountFlow::Confirm { error, .. } => error,
        _ => None,
    };
    let password_value = move || match flow.get() {
        DeleteAccountFlow::Confirm { password, .. } => password,
        _ => String::new(),
    };

    view! {
        <Show when=move || flow.get().is_open()>
            <div class="dialog-backdrop" on:click=close>
                <div class="dialog dialog--danger" on:click=move |ev| ev.stop_propagation()>
                    <h2>"Delete Account"</h2>
                    <Show
                        when=move || matches!(flow.get(), DeleteAccountFlow::Confirm { .. })
                        fallback=move || {
                            view! {
                                <p class="dialog__danger">
                                    "This permanently deletes your account and every short link you created. This cannot be undone."
                                </p>
                                <div class="dialog__actions">
                                    <button class="btn" on:click=close>
                                        "Cancel"
                                    </button>
                                    <button
                                        class="btn btn--danger"
                                        on:click=move |_| flow.update(DeleteAccountFlow::proceed)
                                    >
                                        "Continue"
                                    </button>
                                </div>
                            }
                        }
                    >
                        <label class="dialog__label">
                            "Enter your password to confirm"
                            <input
                                class="dialog__input"
                                type="password"
                                autocomplete="current-password"
                                prop:value=password_value
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    flow.update(|f| f.set_password(&value));
                                }
                                on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                                    if ev.key() == "Enter" {
                                        ev.prevent_default();
                                        submit.run(());
                                    }
                                }
                            />
                        </label>
                        <Show when=move || error().is_some()>
                            <p class="dialog__error">{move || error().unwrap_or_default()}</p>
                        </Show>
                        <div class="dialog__actions">
                            <button class="btn" on:click=close disabled=pending>
                                "Cancel"
                            </button>
                            <button
                                class="btn btn--danger"
                                on:click=move |_| submit.run(())
                                disabled=pending
                            >
                                {move || if pending() { "Deleting..." } else { "Delete my account" }}
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </Show>
    }
}
