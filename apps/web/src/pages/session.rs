//! Session Page
//!
//! Live VNC view of one remote browser: status line, uptime, maximize,
//! close, and clipboard sync in both directions.

use browser_ui_core::{
    Bounds, ClipboardBridge, ClipboardReader, ClipboardWriter, ConnectionController,
    ConnectionStatus, Dispatched, HintSlot, MountScope, Navigator, PageOrigin, RemoteClipboard,
    SessionBootstrap, TransportEvent, UptimeClock, ViewportSizer,
};
use chrono::{DateTime, Utc};
use gloo_timers::callback::{Interval, Timeout};
use leptos::*;
use leptos_router::{use_location, use_navigate, use_params_map, NavigateOptions};
use wasm_bindgen::JsValue;

use crate::api::{ApiClient, RfbTransport};
use crate::app::use_config;
use crate::clipboard::{AsyncClipboard, StagingInput};
use crate::config::millis;
use crate::components::{AppHeader, ManualPasteDialog, SESSION_START_KEY};

/// Hint shown while the staging input waits for the paste gesture
const PASTE_GESTURE_HINT: &str = "Press Ctrl+V to paste";

/// `/session/:id`; remounts the view when the id changes
#[component]
pub fn SessionView() -> impl IntoView {
    let params = use_params_map();
    let browser_id = create_memo(move |_| params.with(|p| p.get("id").cloned().unwrap_or_default()));

    move || {
        let browser_id = browser_id.get();
        view! { <SessionScreen browser_id=browser_id /> }
    }
}

/// [`Navigator`] over the router's `navigate`
struct RouterNavigator<F>(F);

impl<F> Navigator for RouterNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    fn navigate(&self, path: &str) {
        (self.0)(path, NavigateOptions::default())
    }
}

/// Transient hint next to the clipboard buttons
#[derive(Clone, Copy)]
struct Hint {
    slot: StoredValue<HintSlot>,
    text: RwSignal<Option<String>>,
    timer: StoredValue<Option<Timeout>>,
    clear_ms: u32,
}

impl Hint {
    fn new(clear_ms: u32) -> Self {
        Self {
            slot: store_value(HintSlot::new()),
            text: create_rw_signal(None),
            timer: store_value(None),
            clear_ms,
        }
    }

    fn show(self, text: &str) {
        self.show_for(text, self.clear_ms);
    }

    /// Show a hint that stays up for `ms` unless a newer one replaces it
    fn show_for(self, text: &str, ms: u32) {
        let Some(ticket) = self.slot.try_update_value(|slot| slot.show(text)) else {
            return;
        };
        let _ = self.text.try_set(Some(text.to_string()));

        let clear = Timeout::new(ms, move || {
            if self.slot.try_update_value(|slot| slot.expire(ticket)) == Some(true) {
                let _ = self.text.try_set(None);
            }
        });
        // replacing the pending timer cancels it
        let _ = self.timer.try_set_value(Some(clear));
    }

    fn cancel(self) {
        let _ = self.timer.try_set_value(None);
    }
}

#[component]
fn SessionScreen(browser_id: String) -> impl IntoView {
    let config = use_config();
    let client = ApiClient::new(config.api_paths());
    let scope = MountScope::new();

    let remote = RemoteClipboard::new();
    let controller = ConnectionController::new(
        browser_id.as_str(),
        config.transport.clone(),
        remote.clone(),
    );
    let bridge = store_value(ClipboardBridge::new(remote));

    let (status, set_status) = create_signal(controller.status());
    let clock = store_value(UptimeClock::new(supplied_start_time(), Utc::now()));
    let (uptime, set_uptime) = create_signal(clock.with_value(|c| c.display().to_string()));
    let refresh_uptime = move |status: ConnectionStatus| {
        if clock.try_update_value(|c| c.tick(Utc::now(), status)) == Some(true) {
            let _ = set_uptime.try_set(clock.with_value(|c| c.display().to_string()));
        }
    };

    controller.subscribe(move |next| {
        let _ = set_status.try_set(next);
        // freeze the clock on the same turn as the disconnect
        refresh_uptime(next);
    });
    let controller = store_value(controller);

    let sizer = store_value(ViewportSizer::new());
    let (maximized, set_maximized) = create_signal(false);
    let hint = Hint::new(millis(config.hint_clear()));
    let busy = create_rw_signal(false);
    let manual_open = create_rw_signal(false);
    let manual_text = create_rw_signal(String::new());

    let container = create_node_ref::<html::Div>();
    let staging = create_node_ref::<html::Input>();
    let settle = store_value::<Option<Timeout>>(None);

    // Start time: navigation state, else one lookup
    {
        let mut bootstrap = SessionBootstrap::new(browser_id.as_str(), clock.with_value(|c| c.start()));
        if bootstrap.needs_lookup() {
            let client = client.clone();
            let scope = scope.clone();
            spawn_local(async move {
                if let Some(start) = bootstrap.resolve(&client, &scope).await {
                    if clock.try_update_value(|c| c.set_start(start, Utc::now())) == Some(true) {
                        let _ = set_uptime.try_set(clock.with_value(|c| c.display().to_string()));
                    }
                }
            });
        }
    }

    let ticker = store_value(Some(Interval::new(millis(config.uptime_tick()), move || {
        refresh_uptime(status.try_get_untracked().unwrap_or_default());
    })));

    let resize = move || {
        let Some(transport) = controller.try_with_value(ConnectionController::transport).flatten() else {
            return;
        };
        let Some(div) = container.get_untracked() else {
            return;
        };
        let rect = div.get_bounding_client_rect();
        let bounds = Bounds::new(rect.width(), rect.height());
        let outcome = sizer.with_value(|s| s.apply(transport.as_ref(), bounds));
        tracing::trace!(?outcome, "viewport sized");
    };

    // Transport: created once the container is in the document
    let resize_settle_ms = millis(config.resize_settle());
    let paths = config.api_paths();
    let mount_scope = scope.clone();
    let events_client = client.clone();
    container.on_load(move |div| {
        request_animation_frame(move || {
            if !mount_scope.is_active() {
                return;
            }
            let Some(controller) = controller.try_get_value() else {
                return;
            };

            let location = window().location();
            let origin = PageOrigin::from_location(
                &location.protocol().unwrap_or_default(),
                location.host().unwrap_or_default(),
            );
            let url = origin.vnc_url(&paths, controller.browser_id());

            let events = controller.clone();
            let on_event = move |event: TransportEvent| {
                if events.dispatch(event) == Dispatched::CredentialsRequested {
                    let controller = events.clone();
                    let client = events_client.clone();
                    spawn_local(async move {
                        // failures already moved the status to Disconnected
                        let _ = controller.submit_credentials(&client).await;
                    });
                }
            };

            let target: &web_sys::HtmlDivElement = &div;
            let mounted = controller.mount(|| RfbTransport::connect(target.as_ref(), &url, on_event));
            if mounted.is_ok() {
                let _ = settle.try_set_value(Some(Timeout::new(resize_settle_ms, resize)));
            }
        });
    });

    let resize_listener = window_event_listener(ev::resize, move |_| resize());
    let unload_listener = window_event_listener(ev::beforeunload, move |_| {
        controller.with_value(ConnectionController::unload);
    });

    let cleanup_scope = scope;
    on_cleanup(move || {
        resize_listener.remove();
        unload_listener.remove();
        cleanup_scope.end();
        controller.try_with_value(ConnectionController::detach_observers);
        ticker.try_set_value(None);
        settle.try_set_value(None);
        hint.cancel();
        tracing::debug!("session view unmounted; transport left running");
    });

    let on_toggle = move |_| {
        let now_maximized = sizer.try_update_value(ViewportSizer::toggle).unwrap_or(false);
        set_maximized.set(now_maximized);
        // size against the new layout
        request_animation_frame(resize);
    };

    let navigate = use_navigate();
    let listing = config.routes.listing.clone();
    let on_close = move |_| {
        let navigator = RouterNavigator(navigate.clone());
        controller.with_value(|c| c.close(&navigator, &listing));
    };

    let sync_manual = move || {
        let entry = bridge.with_value(ClipboardBridge::manual_entry);
        manual_open.set(entry.is_open());
        manual_text.set(entry.pending().to_string());
    };

    let paste_capture = config.paste_capture();
    let gesture_hint_ms = millis(config.paste_gesture_hint());
    let on_paste = move |_| {
        let controller = controller.get_value();
        let bridge = bridge.get_value();
        if bridge.is_busy() {
            return;
        }
        let (Some(transport), Some(input)) = (controller.transport(), staging.get_untracked()) else {
            return;
        };
        let staging_input = StagingInput::new((*input).clone(), paste_capture)
            .on_armed(move || hint.show_for(PASTE_GESTURE_HINT, gesture_hint_ms));

        busy.set(true);
        spawn_local(async move {
            let readers: [&dyn ClipboardReader; 2] = [&AsyncClipboard, &staging_input];
            let outcome = bridge
                .paste_to_remote(&|| controller.status(), transport.as_ref(), &readers)
                .await;
            let _ = busy.try_set(false);
            tracing::debug!(?outcome, "paste to remote");
            if let Some(text) = outcome.hint() {
                hint.show(text);
            }
            sync_manual();
        });
    };

    let on_copy = move |_| {
        let controller = controller.get_value();
        let bridge = bridge.get_value();
        if bridge.is_busy() {
            return;
        }
        let Some(input) = staging.get_untracked() else {
            return;
        };
        let staging_input = StagingInput::new((*input).clone(), paste_capture);

        busy.set(true);
        spawn_local(async move {
            let writers: [&dyn ClipboardWriter; 2] = [&AsyncClipboard, &staging_input];
            let outcome = bridge.copy_to_local(controller.status(), &writers).await;
            let _ = busy.try_set(false);
            tracing::debug!(?outcome, "copy from remote");
            if let Some(text) = outcome.hint() {
                hint.show(text);
            }
        });
    };

    let on_manual_input = Callback::new(move |text: String| {
        bridge.with_value(|b| b.set_manual_text(text));
        sync_manual();
    });
    let on_manual_paste = Callback::new(move |text: String| {
        bridge.with_value(|b| b.capture_manual_paste(text));
        sync_manual();
    });
    let on_manual_cancel = Callback::new(move |()| {
        bridge.with_value(ClipboardBridge::cancel_manual);
        sync_manual();
    });
    let on_manual_submit = Callback::new(move |()| {
        let controller = controller.get_value();
        let bridge = bridge.get_value();
        match controller.transport() {
            Some(transport) => {
                let outcome = bridge.submit_manual(controller.status(), transport.as_ref());
                tracing::debug!(?outcome, "manual paste submitted");
                if let Some(text) = outcome.hint() {
                    hint.show(text);
                }
            }
            None => bridge.cancel_manual(),
        }
        sync_manual();
    });

    // both buttons share the staging input, so one pending operation blocks both
    let controls_disabled = move || !ClipboardBridge::controls_enabled(status.get()) || busy.get();

    view! {
        <AppHeader />

        <div class="vnc-wrapper">
            <section class="vnc-window" class:maximized=move || maximized.get()>
                <header class="window-header">
                    <div class="window-controls">
                        <button class="control-btn close-btn" title="Close" on:click=on_close />
                        <button
                            class="control-btn maximize-btn fullscreen-btn"
                            class:fullscreen-active=move || maximized.get()
                            title="Fullscreen"
                            on:click=on_toggle
                        />
                    </div>
                    <h1 class="window-title">"VNC Session - " {browser_id}</h1>
                    <div class="clipboard-controls">
                        <span class="clipboard-hint">{move || hint.text.get()}</span>
                        <button
                            class="clipboard-btn"
                            title="Paste local clipboard into the session"
                            disabled=controls_disabled
                            on:click=on_paste
                        >
                            "Paste"
                        </button>
                        <button
                            class="clipboard-btn"
                            title="Copy the session clipboard"
                            disabled=controls_disabled
                            on:click=on_copy
                        >
                            "Copy"
                        </button>
                    </div>
                </header>

                <div class="vnc-container" node_ref=container tabindex="-1">
                    {move || {
                        status
                            .get()
                            .placeholder()
                            .map(|text| view! { <div class="vnc-placeholder">{text}</div> })
                    }}
                </div>

                <footer class="vnc-status-bar">
                    <div>"Uptime: " <time>{move || uptime.get()}</time></div>
                    <div class=move || {
                        if status.get().is_connected() { "status-connected" } else { "status-disconnected" }
                    }>
                        {move || status.get().as_str()}
                    </div>
                </footer>
            </section>
        </div>

        <input
            type="text"
            class="clipboard-staging"
            aria-hidden="true"
            tabindex="-1"
            node_ref=staging
        />

        <ManualPasteDialog
            open=manual_open
            pending=manual_text
            on_input=on_manual_input
            on_paste=on_manual_paste
            on_submit=on_manual_submit
            on_cancel=on_manual_cancel
        />
    }
}

/// Start time the dashboard put in navigation state
fn supplied_start_time() -> Option<DateTime<Utc>> {
    let state = use_location().state.get_untracked().to_js_value();
    if !state.is_object() {
        return None;
    }
    js_sys::Reflect::get(&state, &JsValue::from_str(SESSION_START_KEY))
        .ok()?
        .as_string()?
        .parse()
        .ok()
}
