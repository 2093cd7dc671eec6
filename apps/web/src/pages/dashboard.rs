//! Dashboard Page
//!
//! Polls /api/v1/browsers and lists every session, newest first.

use browser_ui_core::dashboard::{browser_stats, card_key, sort_newest_first};
use browser_ui_core::{BrowserApi, SessionSummary};
use chrono::Utc;
use gloo_timers::callback::Interval;
use leptos::*;

use crate::api::ApiClient;
use crate::app::use_config;
use crate::components::{AppHeader, BrowserCard, StatItem};
use crate::config::millis;

/// Session listing
#[component]
pub fn Dashboard() -> impl IntoView {
    let config = use_config();
    let client = ApiClient::new(config.api_paths());

    let (sessions, set_sessions) = create_signal::<Vec<SessionSummary>>(Vec::new());
    let (loading, set_loading) = create_signal(true);
    let (now, set_now) = create_signal(Utc::now());
    let in_flight = store_value(false);

    let fetch_sessions = move |client: ApiClient| {
        if in_flight.get_value() {
            return;
        }
        in_flight.set_value(true);

        spawn_local(async move {
            match client.list_browsers().await {
                Ok(list) => {
                    let _ = set_sessions.try_set(sort_newest_first(&list));
                }
                Err(e) => {
                    gloo_console::error!("Failed to fetch sessions:", e.to_string());
                }
            }
            let _ = set_loading.try_set(false);
            let _ = in_flight.try_set_value(false);
        });
    };

    // Initial fetch, then poll
    fetch_sessions(client.clone());
    let poll_client = client;
    let poll = Interval::new(millis(config.dashboard_poll()), move || {
        fetch_sessions(poll_client.clone());
    });
    let tick = Interval::new(millis(config.uptime_tick()), move || {
        let _ = set_now.try_set(Utc::now());
    });
    let timers = store_value(Some((poll, tick)));

    on_cleanup(move || {
        // dropping an Interval cancels it
        timers.set_value(None);
    });

    let stats = create_memo(move |_| sessions.with(|list| browser_stats(list)));

    view! {
        <AppHeader>
            <StatItem>
                "BROWSERS TOTAL: " <strong>{move || stats.with(|s| s.total)}</strong>
            </StatItem>
            <StatItem>
                {move || {
                    let by_name = stats.with(|s| s.by_name.clone());
                    let last = by_name.len().saturating_sub(1);
                    by_name
                        .into_iter()
                        .enumerate()
                        .map(|(index, (name, count))| {
                            view! {
                                <span>
                                    {name.to_uppercase()} ": " <strong>{count}</strong>
                                    {(index < last).then_some(" • ")}
                                </span>
                            }
                        })
                        .collect_view()
                }}
            </StatItem>
        </AppHeader>

        <main class="main-content">
            {move || {
                if loading.get() && sessions.with(Vec::is_empty) {
                    view! { <div class="loading">"Loading sessions..."</div> }.into_view()
                } else {
                    view! {
                        <div class="container-grid">
                            <For
                                each=move || sessions.get()
                                key=card_key
                                children=move |session| {
                                    let href = use_config().session_route(&session.browser_id);
                                    view! { <BrowserCard session=session href=href now=now /> }
                                }
                            />
                        </div>
                    }
                    .into_view()
                }
            }}
        </main>
    }
}
