//! Remote-framebuffer transport contract
//!
//! The RFB client library is an external collaborator. The core only sees
//! it through [`RemoteTransport`], which the web app implements on top of
//! the noVNC `RFB` object and tests implement with recording mocks.

use serde::{Deserialize, Serialize};

use crate::api::Password;
use crate::error::Result;

/// X11 keysym for the left Control key
pub const XK_CONTROL_L: u32 = 0xffe3;
/// X11 keysym for lowercase `v`
pub const XK_V: u32 = 0x0076;

/// Flags applied to a freshly constructed transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Scale the remote framebuffer to fit the container
    pub scale_viewport: bool,
    /// Let the server resize the remote desktop to the container
    pub resize_session: bool,
    /// Render the cursor locally
    pub local_cursor: bool,
    /// Clip instead of scaling when the framebuffer is larger
    pub clip_viewport: bool,
    /// Drag-to-pan
    pub drag_viewport: bool,
    /// Ignore local input
    pub view_only: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            scale_viewport: true,
            resize_session: false,
            local_cursor: true,
            clip_viewport: false,
            drag_viewport: false,
            view_only: false,
        }
    }
}

/// Notifications raised by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// `credentialsrequired`
    CredentialsRequired,
    /// `connect`
    Connect,
    /// `disconnect`
    Disconnect {
        /// Whether the transport reported a clean close
        clean: bool,
    },
    /// `clipboard` with the remote text
    Clipboard(String),
}

impl TransportEvent {
    /// DOM event name the transport dispatches
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CredentialsRequired => "credentialsrequired",
            Self::Connect => "connect",
            Self::Disconnect { .. } => "disconnect",
            Self::Clipboard(_) => "clipboard",
        }
    }
}

/// Names of every event the controller subscribes to
pub const SUBSCRIBED_EVENTS: [&str; 4] = ["credentialsrequired", "connect", "disconnect", "clipboard"];

/// One live transport session
pub trait RemoteTransport {
    /// Apply option flags
    fn configure(&self, options: &TransportOptions) -> Result<()>;

    /// Whether `sendCredentials` exists on this transport build
    fn supports_credential_submission(&self) -> bool;

    /// Submit credentials through the transport's own facility
    fn send_credentials(&self, password: &Password) -> Result<()>;

    /// Stage credentials on the handle for the transport to pick up
    fn stage_credentials(&self, password: &Password) -> Result<()>;

    /// Close the connection
    fn disconnect(&self) -> Result<()>;

    /// Whether `requestDesktopSize` exists on this transport build
    fn supports_desktop_resize(&self) -> bool;

    /// Ask the server to resize the remote desktop
    fn request_desktop_size(&self, width: u32, height: u32) -> Result<()>;

    /// Toggle client-side proportional scaling
    fn set_scale_viewport(&self, enabled: bool) -> Result<()>;

    /// Replace the remote clipboard buffer
    fn clipboard_paste_from(&self, text: &str) -> Result<()>;

    /// Inject a key event
    fn send_key(&self, keysym: u32, code: &str, down: bool) -> Result<()>;
}

/// Key events that trigger a paste inside the remote session
#[must_use]
pub fn paste_keystrokes() -> [(u32, &'static str, bool); 4] {
    [
        (XK_CONTROL_L, "ControlLeft", true),
        (XK_V, "KeyV", true),
        (XK_V, "KeyV", false),
        (XK_CONTROL_L, "ControlLeft", false),
    ]
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording transport shared by the module tests

    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::Error;
    use zeroize::Zeroizing;

    /// Transport that records every call
    #[derive(Default)]
    pub struct MockTransport {
        pub calls: RefCell<Vec<String>>,
        pub submitted: RefCell<Option<Zeroizing<String>>>,
        pub staged: RefCell<Option<Zeroizing<String>>>,
        pub no_credential_facility: Cell<bool>,
        pub no_desktop_resize: Cell<bool>,
        pub fail_disconnect: Cell<bool>,
        pub fail_resize: Cell<bool>,
        pub fail_keys: Cell<bool>,
        pub fail_paste: Cell<bool>,
    }

    impl MockTransport {
        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }
    }

    impl RemoteTransport for MockTransport {
        fn configure(&self, options: &TransportOptions) -> Result<()> {
            self.record(format!(
                "configure scale={} resize={}",
                options.scale_viewport, options.resize_session
            ));
            Ok(())
        }

        fn supports_credential_submission(&self) -> bool {
            !self.no_credential_facility.get()
        }

        fn send_credentials(&self, password: &Password) -> Result<()> {
            self.record("send_credentials");
            *self.submitted.borrow_mut() = Some(Zeroizing::new(password.expose().to_string()));
            Ok(())
        }

        fn stage_credentials(&self, password: &Password) -> Result<()> {
            self.record("stage_credentials");
            *self.staged.borrow_mut() = Some(Zeroizing::new(password.expose().to_string()));
            Ok(())
        }

        fn disconnect(&self) -> Result<()> {
            self.record("disconnect");
            if self.fail_disconnect.get() {
                return Err(Error::transport("already closed"));
            }
            Ok(())
        }

        fn supports_desktop_resize(&self) -> bool {
            !self.no_desktop_resize.get()
        }

        fn request_desktop_size(&self, width: u32, height: u32) -> Result<()> {
            self.record(format!("request_desktop_size {width}x{height}"));
            if self.fail_resize.get() {
                return Err(Error::transport("resize rejected"));
            }
            Ok(())
        }

        fn set_scale_viewport(&self, enabled: bool) -> Result<()> {
            self.record(format!("set_scale_viewport {enabled}"));
            Ok(())
        }

        fn clipboard_paste_from(&self, text: &str) -> Result<()> {
            self.record(format!("clipboard_paste_from {text}"));
            if self.fail_paste.get() {
                return Err(Error::transport("not connected"));
            }
            Ok(())
        }

        fn send_key(&self, keysym: u32, code: &str, down: bool) -> Result<()> {
            self.record(format!("send_key {keysym:#x} {code} {down}"));
            if self.fail_keys.get() {
                return Err(Error::transport("keyboard grab lost"));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransportOptions::default();
        assert!(options.scale_viewport);
        assert!(!options.resize_session);
        assert!(options.local_cursor);
        assert!(!options.clip_viewport);
        assert!(!options.drag_viewport);
        assert!(!options.view_only);
    }

    #[test]
    fn test_paste_keystroke_order() {
        let keys = paste_keystrokes();
        assert_eq!(keys[0], (XK_CONTROL_L, "ControlLeft", true));
        assert_eq!(keys[1], (XK_V, "KeyV", true));
        assert_eq!(keys[2], (XK_V, "KeyV", false));
        assert_eq!(keys[3], (XK_CONTROL_L, "ControlLeft", false));
    }

    #[test]
    fn test_event_names_are_subscribed() {
        let events = [
            TransportEvent::CredentialsRequired,
            TransportEvent::Connect,
            TransportEvent::Disconnect { clean: true },
            TransportEvent::Clipboard("x".to_string()),
        ];
        for event in events {
            assert!(SUBSCRIBED_EVENTS.contains(&event.name()));
        }
    }
}
