//! Main Application Component

use browser_ui_core::UiConfig;
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::config::load_config;
use crate::pages::{Dashboard, SessionView};

/// Configuration shared by every page
pub fn use_config() -> UiConfig {
    use_context::<UiConfig>().unwrap_or_default()
}

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_config();
    tracing::debug!(listing = %config.routes.listing, api = %config.api.base_path, "configuration loaded");
    let listing = config.routes.listing.clone();
    let session_path = format!("{}:id", config.routes.session_prefix);
    provide_context(config);

    let root_redirect = listing.clone();
    let fallback_redirect = listing.clone();

    view! {
        <Title text="Selenosis UI" />
        <Meta name="description" content="Remote browser sessions" />
        <Meta name="viewport" content="width=device-width, initial-scale=1" />

        <Router>
            <Routes>
                <Route
                    path="/"
                    view=move || view! { <Redirect path=root_redirect.clone() options=replace() /> }
                />
                <Route path=listing view=Dashboard />
                <Route path=session_path view=SessionView />
                <Route
                    path="/*any"
                    view=move || view! { <Redirect path=fallback_redirect.clone() options=replace() /> }
                />
            </Routes>
        </Router>
    }
}

fn replace() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..Default::default()
    }
}
