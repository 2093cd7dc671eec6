//! UI configuration
//!
//! Defaults are compiled in from `config/default.toml`. The web app may
//! layer a JSON document on top (read from local storage), which only needs
//! to carry the keys it overrides.

use std::time::Duration;

use ::config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::api::ApiPaths;
use crate::error::{Error, Result};
use crate::transport::TransportOptions;

/// Embedded default configuration
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Complete UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    pub api: ApiConfig,
    pub routes: RoutesConfig,
    pub timing: TimingConfig,
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub transport: TransportOptions,
}

/// Backend API location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Path prefix of every REST and WebSocket endpoint
    pub base_path: String,
}

/// Client-side routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Session listing; closing a session returns here
    pub listing: String,
    /// Prefix of the per-session view, followed by the browser id
    pub session_prefix: String,
}

/// Timer cadences, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub uptime_tick_ms: u32,
    pub hint_clear_ms: u32,
    pub resize_settle_ms: u32,
    pub dashboard_poll_ms: u32,
}

/// Clipboard fallback tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// How long the hidden staging input waits for a paste gesture
    pub paste_capture_ms: u32,
}

impl UiConfig {
    /// Load the embedded defaults, optionally overridden by a JSON document
    pub fn load(override_json: Option<&str>) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(json) = override_json.filter(|s| !s.trim().is_empty()) {
            builder = builder.add_source(File::from_str(json, FileFormat::Json));
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the view cannot work with
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("timing.uptime_tick_ms", self.timing.uptime_tick_ms),
            ("timing.hint_clear_ms", self.timing.hint_clear_ms),
            ("timing.dashboard_poll_ms", self.timing.dashboard_poll_ms),
            ("clipboard.paste_capture_ms", self.clipboard.paste_capture_ms),
        ];
        if let Some((key, _)) = intervals.iter().find(|(_, ms)| *ms == 0) {
            return Err(Error::config(format!("{key} must be greater than zero")));
        }

        for (key, path) in [
            ("api.base_path", &self.api.base_path),
            ("routes.listing", &self.routes.listing),
            ("routes.session_prefix", &self.routes.session_prefix),
        ] {
            if !path.starts_with('/') {
                return Err(Error::config(format!("{key} must be an absolute path, got {path:?}")));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn uptime_tick(&self) -> Duration {
        Duration::from_millis(self.timing.uptime_tick_ms.into())
    }

    #[must_use]
    pub fn hint_clear(&self) -> Duration {
        Duration::from_millis(self.timing.hint_clear_ms.into())
    }

    #[must_use]
    pub fn resize_settle(&self) -> Duration {
        Duration::from_millis(self.timing.resize_settle_ms.into())
    }

    #[must_use]
    pub fn dashboard_poll(&self) -> Duration {
        Duration::from_millis(self.timing.dashboard_poll_ms.into())
    }

    #[must_use]
    pub fn paste_capture(&self) -> Duration {
        Duration::from_millis(self.clipboard.paste_capture_ms.into())
    }

    /// How long the paste-gesture instruction stays up; it must outlive the
    /// capture window it describes
    #[must_use]
    pub fn paste_gesture_hint(&self) -> Duration {
        self.hint_clear().max(self.paste_capture())
    }

    /// Endpoint builder rooted at `api.base_path`
    #[must_use]
    pub fn api_paths(&self) -> ApiPaths {
        ApiPaths::new(self.api.base_path.as_str())
    }

    /// Client route of the per-session view
    #[must_use]
    pub fn session_route(&self, browser_id: &str) -> String {
        format!("{}{}", self.routes.session_prefix, browser_id)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_path: "/api/v1".to_string(),
            },
            routes: RoutesConfig {
                listing: "/ui/".to_string(),
                session_prefix: "/session/".to_string(),
            },
            timing: TimingConfig {
                uptime_tick_ms: 1000,
                hint_clear_ms: 2000,
                resize_settle_ms: 200,
                dashboard_poll_ms: 2000,
            },
            clipboard: ClipboardConfig {
                paste_capture_ms: 4000,
            },
            transport: TransportOptions::default(),
        }
    }
}
