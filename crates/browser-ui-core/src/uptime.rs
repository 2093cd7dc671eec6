//! Session uptime formatting and the per-view uptime clock

use chrono::{DateTime, Utc};

use crate::status::ConnectionStatus;

/// Placeholder shown by the session view before a start time is known
pub const UPTIME_PLACEHOLDER: &str = "0s";

/// Elapsed time since `start`, as shown on dashboard cards and the status bar
///
/// `Hh Mm` from one hour, `Mm Ss` from one minute, `Ss` below that.
/// Unknown starts render as `0m 0s`; starts in the future as `Just now`.
#[must_use]
pub fn format_uptime(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(start) = start else {
        return "0m 0s".to_string();
    };

    let elapsed = now.signed_duration_since(start);
    if elapsed.num_milliseconds() < 0 {
        return "Just now".to_string();
    }

    let total_secs = elapsed.num_seconds();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Uptime display of one session view
///
/// Advances on every tick until the connection is `Disconnected`, then
/// keeps its last value forever.
#[derive(Debug, Clone)]
pub struct UptimeClock {
    start: Option<DateTime<Utc>>,
    display: String,
    frozen: bool,
}

impl UptimeClock {
    #[must_use]
    pub fn new(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let mut clock = Self {
            start: None,
            display: UPTIME_PLACEHOLDER.to_string(),
            frozen: false,
        };
        if let Some(start) = start {
            clock.set_start(start, now);
        }
        clock
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Adopt the session start time; a start that is already known wins.
    /// A frozen clock without a start still renders it once and stays frozen.
    pub fn set_start(&mut self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.start.is_some() {
            return false;
        }
        self.start = Some(start);
        self.refresh(now)
    }

    /// Periodic update; returns whether the display changed
    pub fn tick(&mut self, now: DateTime<Utc>, status: ConnectionStatus) -> bool {
        if status.is_terminal() {
            self.frozen = true;
        }
        if self.frozen || self.start.is_none() {
            return false;
        }
        self.refresh(now)
    }

    fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        let next = format_uptime(self.start, now);
        if next == self.display {
            return false;
        }
        self.display = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn t0() -> DateTime<Utc> {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_format_minutes_and_seconds() {
        assert_eq!(format_uptime(Some(t0()), t0() + Duration::seconds(65)), "1m 5s");
    }

    #[test]
    fn test_format_hours_drop_seconds() {
        assert_eq!(format_uptime(Some(t0()), t0() + Duration::seconds(3700)), "1h 1m");
    }

    #[test]
    fn test_format_seconds_only() {
        assert_eq!(format_uptime(Some(t0()), t0()), "0s");
        assert_eq!(format_uptime(Some(t0()), t0() + Duration::milliseconds(59_999)), "59s");
    }

    #[test]
    fn test_format_edge_cases() {
        assert_eq!(format_uptime(None, t0()), "0m 0s");
        assert_eq!(format_uptime(Some(t0()), t0() - Duration::seconds(5)), "Just now");
    }

    #[test]
    fn test_clock_placeholder_without_start() {
        let mut clock = UptimeClock::new(None, t0());
        assert_eq!(clock.display(), UPTIME_PLACEHOLDER);
        assert!(!clock.tick(t0() + Duration::seconds(30), ConnectionStatus::Connected));
        assert_eq!(clock.display(), UPTIME_PLACEHOLDER);
    }

    #[test]
    fn test_clock_advances_while_connected() {
        let mut clock = UptimeClock::new(Some(t0()), t0() + Duration::seconds(1));
        assert_eq!(clock.display(), "1s");
        assert!(clock.tick(t0() + Duration::seconds(65), ConnectionStatus::Connected));
        assert_eq!(clock.display(), "1m 5s");
        assert!(clock.tick(t0() + Duration::seconds(3700), ConnectionStatus::Connecting));
        assert_eq!(clock.display(), "1h 1m");
    }

    #[test]
    fn test_clock_freezes_after_disconnect() {
        let mut clock = UptimeClock::new(Some(t0()), t0());
        clock.tick(t0() + Duration::seconds(65), ConnectionStatus::Connected);
        assert_eq!(clock.display(), "1m 5s");

        assert!(!clock.tick(t0() + Duration::seconds(120), ConnectionStatus::Disconnected));
        assert!(clock.is_frozen());
        for secs in [200, 4000, 90_000] {
            clock.tick(t0() + Duration::seconds(secs), ConnectionStatus::Disconnected);
            assert_eq!(clock.display(), "1m 5s");
        }
    }

    #[test]
    fn test_late_start_adopted_once() {
        let mut clock = UptimeClock::new(None, t0());
        assert!(clock.set_start(t0(), t0() + Duration::seconds(65)));
        assert_eq!(clock.display(), "1m 5s");

        let other = t0() - Duration::hours(5);
        assert!(!clock.set_start(other, t0() + Duration::seconds(65)));
        assert_eq!(clock.start(), Some(t0()));
    }

    #[test]
    fn test_start_arriving_after_freeze_renders_once() {
        let mut clock = UptimeClock::new(None, t0());
        clock.tick(t0() + Duration::seconds(10), ConnectionStatus::Disconnected);
        assert!(clock.is_frozen());
        assert_eq!(clock.display(), UPTIME_PLACEHOLDER);

        assert!(clock.set_start(t0(), t0() + Duration::seconds(42)));
        assert_eq!(clock.display(), "42s");
        assert!(clock.is_frozen());

        assert!(!clock.tick(t0() + Duration::seconds(600), ConnectionStatus::Disconnected));
        assert!(!clock.set_start(t0() - Duration::hours(1), t0() + Duration::seconds(600)));
        assert_eq!(clock.display(), "42s");
    }
}
