//! Backend API contract
//!
//! Wire types for the session orchestrator's REST endpoints, the endpoint
//! path builders, and the [`BrowserApi`] seam the web app implements with
//! `gloo-net`.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

/// Lifecycle phase of a browser pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Running,
    Pending,
    Failed,
    Succeeded,
    #[serde(other)]
    Unknown,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
            Self::Unknown => "Unknown",
        }
    }

    /// Only running sessions accept a viewer
    #[must_use]
    pub fn is_connectable(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// One entry of `GET /api/v1/browsers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(default)]
    pub session_id: String,
    pub browser_id: String,
    #[serde(default)]
    pub browser_name: String,
    #[serde(default)]
    pub browser_version: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default = "unknown_phase")]
    pub phase: SessionPhase,
}

fn unknown_phase() -> SessionPhase {
    SessionPhase::Unknown
}

/// One-time connection secret for the transport
#[derive(Clone, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the secret for handing to the transport
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Body of `GET /api/v1/browsers/{id}/vnc/settings`
#[derive(Debug, Clone, Deserialize)]
pub struct VncSettings {
    pub password: Password,
}

/// Endpoint path builder rooted at the configured API prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    base: String,
}

impl ApiPaths {
    #[must_use]
    pub fn new(base_path: impl Into<String>) -> Self {
        let base = base_path.into().trim_end_matches('/').to_string();
        Self { base }
    }

    /// `GET {base}/browsers`
    #[must_use]
    pub fn browsers(&self) -> String {
        format!("{}/browsers", self.base)
    }

    /// `GET {base}/browsers/{id}`
    #[must_use]
    pub fn browser(&self, browser_id: &str) -> String {
        format!("{}/browsers/{}", self.base, browser_id)
    }

    /// `GET {base}/browsers/{id}/vnc/settings`
    #[must_use]
    pub fn vnc_settings(&self, browser_id: &str) -> String {
        format!("{}/browsers/{}/vnc/settings", self.base, browser_id)
    }

    /// `WS(S) {base}/browsers/{id}/vnc`, path only
    #[must_use]
    pub fn vnc_stream(&self, browser_id: &str) -> String {
        format!("{}/browsers/{}/vnc", self.base, browser_id)
    }
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self::new("/api/v1")
    }
}

/// Scheme and authority of the page hosting the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    pub secure: bool,
    pub host: String,
}

impl PageOrigin {
    /// Build from `location.protocol` and `location.host`
    #[must_use]
    pub fn from_location(protocol: &str, host: impl Into<String>) -> Self {
        Self {
            secure: protocol.eq_ignore_ascii_case("https:"),
            host: host.into(),
        }
    }

    /// WebSocket URL of the RFB stream; `wss` iff the page is secure
    #[must_use]
    pub fn vnc_url(&self, paths: &ApiPaths, browser_id: &str) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}{}", scheme, self.host, paths.vnc_stream(browser_id))
    }
}

/// Session orchestrator REST client
#[async_trait(?Send)]
pub trait BrowserApi {
    /// `GET /browsers`
    async fn list_browsers(&self) -> Result<Vec<SessionSummary>>;

    /// `GET /browsers/{id}`
    async fn get_browser(&self, browser_id: &str) -> Result<SessionSummary>;

    /// `GET /browsers/{id}/vnc/settings`
    async fn vnc_settings(&self, browser_id: &str) -> Result<VncSettings>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted API shared by the module tests

    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    pub struct MockBrowserApi {
        pub sessions: RefCell<Vec<SessionSummary>>,
        pub lookup: RefCell<Option<SessionSummary>>,
        pub password: RefCell<Option<String>>,
        pub lookup_calls: Cell<usize>,
        pub settings_calls: Cell<usize>,
    }

    impl MockBrowserApi {
        pub fn with_lookup(summary: SessionSummary) -> Self {
            let api = Self::default();
            *api.lookup.borrow_mut() = Some(summary);
            api
        }

        pub fn with_password(password: &str) -> Self {
            let api = Self::default();
            *api.password.borrow_mut() = Some(password.to_string());
            api
        }
    }

    #[async_trait(?Send)]
    impl BrowserApi for MockBrowserApi {
        async fn list_browsers(&self) -> Result<Vec<SessionSummary>> {
            Ok(self.sessions.borrow().clone())
        }

        async fn get_browser(&self, browser_id: &str) -> Result<SessionSummary> {
            self.lookup_calls.set(self.lookup_calls.get() + 1);
            self.lookup.borrow().clone().ok_or_else(|| Error::Status {
                path: ApiPaths::default().browser(browser_id),
                status: 404,
            })
        }

        async fn vnc_settings(&self, browser_id: &str) -> Result<VncSettings> {
            self.settings_calls.set(self.settings_calls.get() + 1);
            match self.password.borrow().as_deref() {
                Some(secret) => Ok(VncSettings {
                    password: Password::new(secret),
                }),
                None => Err(Error::Status {
                    path: ApiPaths::default().vnc_settings(browser_id),
                    status: 500,
                }),
            }
        }
    }

    pub fn summary(browser_id: &str, start: &str) -> SessionSummary {
        SessionSummary {
            session_id: format!("sess-{browser_id}"),
            browser_id: browser_id.to_string(),
            browser_name: "chrome".to_string(),
            browser_version: "120.0".to_string(),
            start_time: Some(start.parse().unwrap()),
            phase: SessionPhase::Running,
        }
    }
}
