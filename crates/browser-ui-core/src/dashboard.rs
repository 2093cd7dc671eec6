//! Session listing helpers for the dashboard

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::api::{SessionPhase, SessionSummary};

/// Number of browser names shown in the header
pub const TOP_BROWSERS: usize = 4;

/// Header counters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowserStats {
    pub total: usize,
    /// `(name, count)`, most common first
    pub by_name: Vec<(String, usize)>,
}

/// Newest sessions first; sessions without a start time go last
#[must_use]
pub fn sort_newest_first(sessions: &[SessionSummary]) -> Vec<SessionSummary> {
    let mut sorted = sessions.to_vec();
    sorted.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    sorted
}

/// Total count plus the most common browser names
#[must_use]
pub fn browser_stats(sessions: &[SessionSummary]) -> BrowserStats {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for session in sessions {
        *counts.entry(session.browser_name.as_str()).or_default() += 1;
    }

    let mut by_name: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    // ties broken by name so the header does not flicker between polls
    by_name.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    by_name.truncate(TOP_BROWSERS);

    BrowserStats {
        total: sessions.len(),
        by_name,
    }
}

/// Identity of a rendered card: `(browser_id, phase, start_time, name, version)`
pub type CardKey = (String, SessionPhase, Option<DateTime<Utc>>, String, String);

/// Everything a card renders from the row, so a poll that changes any of it
/// rebuilds the card
#[must_use]
pub fn card_key(session: &SessionSummary) -> CardKey {
    (
        session.browser_id.clone(),
        session.phase,
        session.start_time,
        session.browser_name.clone(),
        session.browser_version.clone(),
    )
}

/// Single-letter badge for a browser name
#[must_use]
pub fn browser_icon(name: &str) -> String {
    let lower = name.to_lowercase();
    let known = [
        ("chrome", "C"),
        ("firefox", "F"),
        ("opera", "O"),
        ("safari", "S"),
    ];
    if let Some((_, icon)) = known.iter().find(|(needle, _)| lower.contains(needle)) {
        return (*icon).to_string();
    }
    name.chars()
        .next()
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}
