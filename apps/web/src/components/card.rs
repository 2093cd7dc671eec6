//! Card Components

use browser_ui_core::dashboard::browser_icon;
use browser_ui_core::{format_uptime, SessionSummary};
use chrono::{DateTime, Utc};
use leptos::*;
use leptos_router::{State, A};
use wasm_bindgen::JsValue;

/// Navigation-state key carrying the session start time
pub const SESSION_START_KEY: &str = "sessionStartTime";

/// One remote browser session on the dashboard grid
#[component]
pub fn BrowserCard(
    session: SessionSummary,
    #[prop(into)] href: String,
    now: ReadSignal<DateTime<Utc>>,
) -> impl IntoView {
    let connectable = session.phase.is_connectable();
    let start = session.start_time;
    let icon = browser_icon(&session.browser_name);
    let uptime = move || format_uptime(start, now.get());

    let connect = if connectable {
        view! {
            <A href=href class="vnc-button" state=start_state(start)>
                "CONNECT"
            </A>
        }
        .into_view()
    } else {
        view! {
            <button class="vnc-button disabled" disabled=true>
                "CONNECT"
            </button>
        }
        .into_view()
    };

    view! {
        <div class="browser-card" class:disabled=!connectable>
            <h2 class="browser-uuid" title=session.browser_id.clone()>
                {session.browser_id.clone()}
            </h2>

            <div class="browser-header-row">
                <div class="browser-icon">{icon}</div>
                <div>
                    <div class="browser-name">{session.browser_name.clone()}</div>
                    <div class="browser-version">{session.browser_version.clone()}</div>
                </div>
            </div>

            <div class="browser-details">
                <div class="detail-row">
                    <span class="detail-label">"Session ID"</span>
                    <span class="detail-value browser-id" title=session.session_id.clone()>
                        {session.session_id.clone()}
                    </span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">"Status"</span>
                    <span class="detail-value">{session.phase.as_str()}</span>
                </div>
            </div>

            <div class="browser-meta">
                <div>"Uptime: " <time>{uptime}</time></div>
                {connect}
            </div>
        </div>
    }
}

/// Header counter
#[component]
pub fn StatItem(children: Children) -> impl IntoView {
    view! { <div class="stat-item">{children()}</div> }
}

/// `{ sessionStartTime: <rfc3339> }`, or no state when the start is unknown
fn start_state(start: Option<DateTime<Utc>>) -> State {
    let Some(start) = start else {
        return State(None);
    };
    let state = js_sys::Object::new();
    let stored = js_sys::Reflect::set(
        &state,
        &JsValue::from_str(SESSION_START_KEY),
        &JsValue::from_str(&start.to_rfc3339()),
    );
    match stored {
        Ok(_) => State(Some(state.into())),
        Err(_) => State(None),
    }
}
