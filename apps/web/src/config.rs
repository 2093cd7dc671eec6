//! Runtime configuration for the web app

use std::time::Duration;

use browser_ui_core::UiConfig;
use gloo_storage::{LocalStorage, Storage};

/// Local storage key holding a JSON override of the embedded defaults
pub const CONFIG_STORAGE_KEY: &str = "browser-ui.config";

/// Embedded defaults plus whatever override the browser has stored
pub fn load_config() -> UiConfig {
    let stored = LocalStorage::get::<serde_json::Value>(CONFIG_STORAGE_KEY)
        .ok()
        .map(|value| value.to_string());

    match UiConfig::load(stored.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(key = CONFIG_STORAGE_KEY, "ignoring stored configuration: {}", err);
            UiConfig::default()
        }
    }
}

/// Milliseconds for the gloo timers, saturating at `u32::MAX`
pub fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
