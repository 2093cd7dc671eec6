//! Error types for browser-ui-core
//!
//! Every failure the session view can observe is folded into [`Error`].
//! None of them is ever shown to the user as a dialog. The clipboard chains
//! only fall through to a weaker mechanism on [`Error::is_recoverable`]
//! errors; anything else ends the chain.

use thiserror::Error;

/// Coarse failure taxonomy used to pick a recovery path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Session lookup or settings fetch failed; never retried
    TransientFetch,
    /// Transport failed or was used after teardown; surfaces as `Disconnected`
    Transport,
    /// Local clipboard API missing or denied; fall through to the next mechanism
    ClipboardPermission,
    /// Misconfiguration detected at start-up
    Config,
    /// Programming or lifecycle error
    Internal,
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// Response carried a non-success status
    #[error("request to {path} failed with status {status}")]
    Status {
        /// Request path
        path: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Lookup answered for a different session
    #[error("session identity mismatch: requested {requested}, got {returned}")]
    IdentityMismatch {
        /// Identifier that was requested
        requested: String,
        /// Identifier the backend returned
        returned: String,
    },

    /// Transport call failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Transport lacks an optional facility
    #[error("transport does not support {0}")]
    TransportUnsupported(&'static str),

    /// No live transport handle
    #[error("no transport handle")]
    NoTransport,

    /// A transport handle was already created for this mount
    #[error("transport handle already created for this mount")]
    HandleAlreadyCreated,

    /// Clipboard mechanism not available in this browser
    #[error("clipboard mechanism unavailable: {0}")]
    ClipboardUnavailable(&'static str),

    /// Clipboard access refused by the browser or user
    #[error("clipboard access denied: {0}")]
    ClipboardDenied(String),

    /// Paste gesture did not arrive in time
    #[error("paste capture timed out")]
    PasteTimeout,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a network error
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a decode error
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a transport error
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a clipboard denial
    #[must_use]
    pub fn clipboard_denied(msg: impl Into<String>) -> Self {
        Self::ClipboardDenied(msg.into())
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Recovery class of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_)
            | Self::Status { .. }
            | Self::Decode(_)
            | Self::IdentityMismatch { .. } => ErrorKind::TransientFetch,
            Self::Transport(_) | Self::TransportUnsupported(_) | Self::NoTransport => {
                ErrorKind::Transport
            }
            Self::ClipboardUnavailable(_) | Self::ClipboardDenied(_) | Self::PasteTimeout => {
                ErrorKind::ClipboardPermission
            }
            Self::Config(_) => ErrorKind::Config,
            Self::HandleAlreadyCreated => ErrorKind::Internal,
        }
    }

    /// Whether a weaker mechanism may still succeed after this error
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::ClipboardPermission)
    }

    /// Short machine-readable code, used in log fields
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_error",
            Self::Status { .. } => "http_status",
            Self::Decode(_) => "decode_error",
            Self::IdentityMismatch { .. } => "identity_mismatch",
            Self::Transport(_) => "transport_error",
            Self::TransportUnsupported(_) => "transport_unsupported",
            Self::NoTransport => "no_transport",
            Self::HandleAlreadyCreated => "handle_already_created",
            Self::ClipboardUnavailable(_) => "clipboard_unavailable",
            Self::ClipboardDenied(_) => "clipboard_denied",
            Self::PasteTimeout => "paste_timeout",
            Self::Config(_) => "config_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::network("offline").kind(), ErrorKind::TransientFetch);
        assert_eq!(
            Error::Status {
                path: "/api/v1/browsers/x".to_string(),
                status: 404
            }
            .kind(),
            ErrorKind::TransientFetch
        );
        assert_eq!(Error::transport("closed").kind(), ErrorKind::Transport);
        assert_eq!(Error::PasteTimeout.kind(), ErrorKind::ClipboardPermission);
        assert_eq!(Error::HandleAlreadyCreated.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_only_clipboard_errors_are_recoverable() {
        assert!(Error::clipboard_denied("NotAllowedError").is_recoverable());
        assert!(Error::ClipboardUnavailable("readText").is_recoverable());
        assert!(!Error::network("offline").is_recoverable());
        assert!(!Error::NoTransport.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::IdentityMismatch {
            requested: "abc123".to_string(),
            returned: "zzz".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("zzz"));
        assert_eq!(err.code(), "identity_mismatch");
    }

    #[test]
    fn test_from_serde_error() {
        let result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        let err: Error = result.unwrap_err().into();
        assert_eq!(err.code(), "decode_error");
    }
}
