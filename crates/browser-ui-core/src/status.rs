//! Connection status state machine
//!
//! `Connecting → Connected → Disconnected`, plus `Connecting → Disconnected`
//! when setup fails before the transport connects. `Disconnected` is
//! terminal and nothing ever returns to `Connecting`.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Connection status shown on the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    /// Text of the screen placeholder; `None` once frames are flowing
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Connecting => Some("Session Loading..."),
            Self::Connected => None,
            Self::Disconnected => Some("Session Disconnected"),
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs that can move the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusInput {
    /// Transport reported `connect`
    TransportConnected,
    /// Transport reported `disconnect`
    TransportDisconnected,
    /// Setup failed (credential fetch, construction)
    SetupFailed,
}

/// An applied status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ConnectionStatus,
    pub to: ConnectionStatus,
}

type TransitionFn = fn(ConnectionStatus) -> Option<ConnectionStatus>;

fn on_connected(current: ConnectionStatus) -> Option<ConnectionStatus> {
    match current {
        ConnectionStatus::Connecting => Some(ConnectionStatus::Connected),
        _ => None,
    }
}

fn on_disconnected(current: ConnectionStatus) -> Option<ConnectionStatus> {
    match current {
        ConnectionStatus::Connecting | ConnectionStatus::Connected => {
            Some(ConnectionStatus::Disconnected)
        }
        ConnectionStatus::Disconnected => None,
    }
}

/// Dispatch table from input kind to transition function
fn transition_fn(input: StatusInput) -> TransitionFn {
    match input {
        StatusInput::TransportConnected => on_connected,
        StatusInput::TransportDisconnected | StatusInput::SetupFailed => on_disconnected,
    }
}

/// Single current-status variable plus its transition rules
#[derive(Debug, Clone, Default)]
pub struct StatusMachine {
    current: ConnectionStatus,
}

impl StatusMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> ConnectionStatus {
        self.current
    }

    /// Apply an input; illegal or no-op inputs leave the status untouched
    pub fn apply(&mut self, input: StatusInput) -> Option<Transition> {
        let from = self.current;
        match transition_fn(input)(from) {
            Some(to) => {
                self.current = to;
                Some(Transition { from, to })
            }
            None => {
                debug!(?input, status = %from, "ignoring status input");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_connecting() {
        assert_eq!(StatusMachine::new().current(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_happy_path() {
        let mut machine = StatusMachine::new();
        let t = machine.apply(StatusInput::TransportConnected).unwrap();
        assert_eq!(t.from, ConnectionStatus::Connecting);
        assert_eq!(t.to, ConnectionStatus::Connected);

        let t = machine.apply(StatusInput::TransportDisconnected).unwrap();
        assert_eq!(t.to, ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_setup_failure_skips_connected() {
        let mut machine = StatusMachine::new();
        let t = machine.apply(StatusInput::SetupFailed).unwrap();
        assert_eq!(t.from, ConnectionStatus::Connecting);
        assert_eq!(t.to, ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_disconnected_is_terminal() {
        let mut machine = StatusMachine::new();
        machine.apply(StatusInput::TransportDisconnected);

        for input in [
            StatusInput::TransportConnected,
            StatusInput::TransportDisconnected,
            StatusInput::SetupFailed,
        ] {
            assert!(machine.apply(input).is_none());
            assert_eq!(machine.current(), ConnectionStatus::Disconnected);
        }
    }

    #[test]
    fn test_never_returns_to_connecting() {
        let inputs = [
            StatusInput::TransportConnected,
            StatusInput::TransportDisconnected,
            StatusInput::SetupFailed,
        ];
        // every sequence of length 3
        for a in inputs {
            for b in inputs {
                for c in inputs {
                    let mut machine = StatusMachine::new();
                    for input in [a, b, c] {
                        if let Some(t) = machine.apply(input) {
                            assert_ne!(t.to, ConnectionStatus::Connecting);
                            assert_ne!(t.from, t.to);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_repeated_connect_is_noop() {
        let mut machine = StatusMachine::new();
        machine.apply(StatusInput::TransportConnected);
        assert!(machine.apply(StatusInput::TransportConnected).is_none());
        assert_eq!(machine.current(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_placeholder_text() {
        assert_eq!(
            ConnectionStatus::Connecting.placeholder(),
            Some("Session Loading...")
        );
        assert_eq!(ConnectionStatus::Connected.placeholder(), None);
        assert_eq!(
            ConnectionStatus::Disconnected.placeholder(),
            Some("Session Disconnected")
        );
    }
}
