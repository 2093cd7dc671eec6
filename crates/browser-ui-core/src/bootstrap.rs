//! Session start-time bootstrap
//!
//! The dashboard hands the start time over in navigation state. When the
//! view is opened directly (bookmark, reload) the start time is looked up
//! once; any failure leaves it unknown for the lifetime of the mount.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::BrowserApi;
use crate::error::Error;
use crate::lifecycle::MountScope;

/// Where the authoritative start time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSource {
    /// Carried in navigation state
    Navigation,
    /// Returned by the session lookup
    Lookup,
}

/// Resolves the start time of one session view
#[derive(Debug, Clone)]
pub struct SessionBootstrap {
    browser_id: String,
    start: Option<(DateTime<Utc>, StartSource)>,
    lookup_issued: bool,
}

impl SessionBootstrap {
    #[must_use]
    pub fn new(browser_id: impl Into<String>, supplied: Option<DateTime<Utc>>) -> Self {
        Self {
            browser_id: browser_id.into(),
            start: supplied.map(|start| (start, StartSource::Navigation)),
            lookup_issued: false,
        }
    }

    #[must_use]
    pub fn browser_id(&self) -> &str {
        &self.browser_id
    }

    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start.map(|(start, _)| start)
    }

    #[must_use]
    pub fn source(&self) -> Option<StartSource> {
        self.start.map(|(_, source)| source)
    }

    /// Whether [`resolve`](Self::resolve) would hit the network
    #[must_use]
    pub fn needs_lookup(&self) -> bool {
        self.start.is_none() && !self.lookup_issued
    }

    /// Produce the start time, looking it up at most once
    pub async fn resolve(
        &mut self,
        api: &dyn BrowserApi,
        scope: &MountScope,
    ) -> Option<DateTime<Utc>> {
        if !self.needs_lookup() {
            return self.start_time();
        }
        self.lookup_issued = true;

        let result = api.get_browser(&self.browser_id).await;

        if !scope.is_active() {
            debug!(browser_id = %self.browser_id, "discarding session lookup for ended mount");
            return None;
        }

        let summary = match result {
            Ok(summary) => summary,
            Err(err) => {
                warn!(browser_id = %self.browser_id, code = err.code(), "session lookup failed: {}", err);
                return None;
            }
        };

        if summary.browser_id != self.browser_id {
            let err = Error::IdentityMismatch {
                requested: self.browser_id.clone(),
                returned: summary.browser_id,
            };
            warn!(code = err.code(), "{}", err);
            return None;
        }

        match summary.start_time {
            Some(start) => {
                debug!(browser_id = %self.browser_id, %start, "session start time resolved");
                self.start = Some((start, StartSource::Lookup));
                Some(start)
            }
            None => {
                debug!(browser_id = %self.browser_id, "session has no start time yet");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{summary, MockBrowserApi};

    #[tokio::test]
    async fn test_supplied_start_skips_network() {
        let start: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
        let api = MockBrowserApi::with_lookup(summary("abc123", "2020-01-01T00:00:00Z"));
        let mut bootstrap = SessionBootstrap::new("abc123", Some(start));

        assert!(!bootstrap.needs_lookup());
        assert_eq!(bootstrap.resolve(&api, &MountScope::new()).await, Some(start));
        assert_eq!(api.lookup_calls.get(), 0);
        assert_eq!(bootstrap.source(), Some(StartSource::Navigation));
    }

    #[tokio::test]
    async fn test_lookup_adopts_matching_start() {
        let api = MockBrowserApi::with_lookup(summary("abc123", "2024-05-01T10:00:00Z"));
        let mut bootstrap = SessionBootstrap::new("abc123", None);

        let start = bootstrap.resolve(&api, &MountScope::new()).await;
        assert_eq!(start, Some("2024-05-01T10:00:00Z".parse().unwrap()));
        assert_eq!(bootstrap.source(), Some(StartSource::Lookup));
        assert_eq!(api.lookup_calls.get(), 1);

        // known now; never looked up again
        bootstrap.resolve(&api, &MountScope::new()).await;
        assert_eq!(api.lookup_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_identity_mismatch_leaves_start_unset() {
        let api = MockBrowserApi::with_lookup(summary("someone-else", "2024-05-01T10:00:00Z"));
        let mut bootstrap = SessionBootstrap::new("abc123", None);

        assert_eq!(bootstrap.resolve(&api, &MountScope::new()).await, None);
        assert!(bootstrap.start_time().is_none());
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let api = MockBrowserApi::default();
        let mut bootstrap = SessionBootstrap::new("abc123", None);
        let scope = MountScope::new();

        assert_eq!(bootstrap.resolve(&api, &scope).await, None);
        assert_eq!(bootstrap.resolve(&api, &scope).await, None);
        assert_eq!(api.lookup_calls.get(), 1);
        assert!(!bootstrap.needs_lookup());
    }

    #[tokio::test]
    async fn test_late_response_after_unmount_is_discarded() {
        let api = MockBrowserApi::with_lookup(summary("abc123", "2024-05-01T10:00:00Z"));
        let mut bootstrap = SessionBootstrap::new("abc123", None);
        let scope = MountScope::new();
        scope.end();

        assert_eq!(bootstrap.resolve(&api, &scope).await, None);
        assert!(bootstrap.start_time().is_none());
    }

    #[tokio::test]
    async fn test_null_start_time_stays_unset() {
        let mut record = summary("abc123", "2024-05-01T10:00:00Z");
        record.start_time = None;
        let api = MockBrowserApi::with_lookup(record);
        let mut bootstrap = SessionBootstrap::new("abc123", None);

        assert_eq!(bootstrap.resolve(&api, &MountScope::new()).await, None);
        assert_eq!(api.lookup_calls.get(), 1);
    }
}
