//! Public landing page.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::AuthState;

const FEATURES: &[(&str, &str)] = &[
    ("Lightning Fast", "Generate short links instantly. No delays, no waiting."),
    ("Analytics", "Track clicks for every link you create."),
    ("QR Codes", "Every link gets a QR code you can download and share anywhere."),
    ("Custom Links", "Pick a custom code that matches your brand."),
    ("Secure", "Your links are tied to your account and only you can manage them."),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let signed_in = move || auth.get().is_authenticated();

    view! {
        <div class="landing-page">
            <header class="landing-page__header">
                <span class="landing-page__brand">"Trimly"</span>
                <nav class="landing-page__nav">
                    <Show
                        when=signed_in
                        fallback=|| {
                            view! {
                                <A href="/login">"Login"</A>
                                <A href="/signup">"Get Started"</A>
                            }
                        }
                    >
                        <A href="/dashboard">"Dashboard"</A>
                    </Show>
                </nav>
            </header>
            <section class="landing-page__hero">
                <h1>"Shorten URLs. Track Everything."</h1>
                <p>
                    "Create short, memorable links and see how they perform. Built for marketers, developers and creators."
                </p>
                <div class="landing-page__cta">
                    <A href="/signup">"Start for Free"</A>
                    <A href="/login">"Sign In"</A>
                </div>
            </section>
            <section class="landing-page__features">
                {FEATURES
                    .iter()
                    .map(|(title, body)| {
                        view! {
                            <article class="feature-card">
                                <h3>{*title}</h3>
                                <p>{*body}</p>
                            </article>
                        }
                    })
                    .collect::<Vec<_>>()}
            </section>
        </div>
    }
}
