//! Transient clipboard hint
//!
//! One pending clear per slot: showing a new hint supersedes the previous
//! one, so only the newest timer is allowed to clear the text. The web app
//! owns the actual timer and reports back with the ticket it was given.

/// Proof that a particular hint was shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintTicket(u64);

/// Hint text plus its single pending-clear slot
#[derive(Debug, Clone, Default)]
pub struct HintSlot {
    text: Option<String>,
    generation: u64,
}

impl HintSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Show a hint; the returned ticket must be presented to clear it
    pub fn show(&mut self, text: impl Into<String>) -> HintTicket {
        self.generation += 1;
        self.text = Some(text.into());
        HintTicket(self.generation)
    }

    /// Clear the hint if `ticket` belongs to the newest one
    pub fn expire(&mut self, ticket: HintTicket) -> bool {
        if ticket.0 != self.generation || self.text.is_none() {
            return false;
        }
        self.text = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_clears_with_its_ticket() {
        let mut slot = HintSlot::new();
        let ticket = slot.show("Pasted to remote");
        assert_eq!(slot.text(), Some("Pasted to remote"));
        assert!(slot.expire(ticket));
        assert_eq!(slot.text(), None);
    }

    #[test]
    fn test_repeat_action_supersedes_pending_clear() {
        let mut slot = HintSlot::new();
        let stale = slot.show("Copied from remote");
        let fresh = slot.show("Copied from remote");

        assert!(!slot.expire(stale));
        assert!(slot.text().is_some());
        assert!(slot.expire(fresh));
        assert!(slot.text().is_none());
    }

    #[test]
    fn test_double_expire_is_harmless() {
        let mut slot = HintSlot::new();
        let ticket = slot.show("x");
        assert!(slot.expire(ticket));
        assert!(!slot.expire(ticket));
    }
}
