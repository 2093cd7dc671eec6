//! Connection controller
//!
//! Owns the transport handle of one session view and maps transport
//! notifications onto the status machine. The handle is created once per
//! mount and only torn down by an explicit close or a page unload; an
//! ordinary unmount leaves the remote session running.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::api::BrowserApi;
use crate::clipboard::RemoteClipboard;
use crate::error::{Error, Result};
use crate::lifecycle::HandleSlot;
use crate::status::{ConnectionStatus, StatusInput, StatusMachine, Transition};
use crate::transport::{RemoteTransport, TransportEvent, TransportOptions};

/// Client-side router
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// What the controller did with a transport notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Status moved
    Status(Transition),
    /// Remote clipboard snapshot replaced
    ClipboardUpdated,
    /// Caller must run [`ConnectionController::submit_credentials`]
    CredentialsRequested,
    /// Notification had no effect
    Ignored,
}

type StatusObserver = Rc<dyn Fn(ConnectionStatus)>;

/// Connection lifecycle of one session view
#[derive(Clone)]
pub struct ConnectionController {
    browser_id: Rc<str>,
    options: TransportOptions,
    handle: HandleSlot<dyn RemoteTransport>,
    status: Rc<RefCell<StatusMachine>>,
    observers: Rc<RefCell<Vec<StatusObserver>>>,
    remote_clipboard: RemoteClipboard,
}

impl ConnectionController {
    #[must_use]
    pub fn new(
        browser_id: impl Into<Rc<str>>,
        options: TransportOptions,
        remote_clipboard: RemoteClipboard,
    ) -> Self {
        Self {
            browser_id: browser_id.into(),
            options,
            handle: HandleSlot::new(),
            status: Rc::new(RefCell::new(StatusMachine::new())),
            observers: Rc::default(),
            remote_clipboard,
        }
    }

    #[must_use]
    pub fn browser_id(&self) -> &str {
        &self.browser_id
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().current()
    }

    /// The live transport, if set up and not yet surrendered
    #[must_use]
    pub fn transport(&self) -> Option<Rc<dyn RemoteTransport>> {
        self.handle.get()
    }

    /// Call `observer` on every status change
    pub fn subscribe(&self, observer: impl Fn(ConnectionStatus) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    /// Drop every observer; used when the view unmounts
    pub fn detach_observers(&self) {
        self.observers.borrow_mut().clear();
    }

    /// Construct and configure the transport, at most once
    pub fn mount<F>(&self, factory: F) -> Result<Rc<dyn RemoteTransport>>
    where
        F: FnOnce() -> Result<Rc<dyn RemoteTransport>>,
    {
        let options = &self.options;
        let result = self.handle.install(|| {
            let transport = factory()?;
            transport.configure(options)?;
            Ok(transport)
        });

        match result {
            Ok(transport) => {
                info!(browser_id = %self.browser_id, "transport created");
                Ok(transport)
            }
            Err(Error::HandleAlreadyCreated) => {
                debug!(browser_id = %self.browser_id, "transport already created for this mount");
                Err(Error::HandleAlreadyCreated)
            }
            Err(err) => {
                warn!(browser_id = %self.browser_id, "transport setup failed: {}", err);
                self.apply(StatusInput::SetupFailed);
                Err(err)
            }
        }
    }

    /// Route one transport notification
    pub fn dispatch(&self, event: TransportEvent) -> Dispatched {
        let input = match event {
            TransportEvent::CredentialsRequired => return Dispatched::CredentialsRequested,
            TransportEvent::Clipboard(text) => {
                self.remote_clipboard.observe(text);
                return Dispatched::ClipboardUpdated;
            }
            TransportEvent::Connect => StatusInput::TransportConnected,
            TransportEvent::Disconnect { clean } => {
                debug!(browser_id = %self.browser_id, clean, "transport disconnected");
                StatusInput::TransportDisconnected
            }
        };

        self.apply(input)
            .map_or(Dispatched::Ignored, Dispatched::Status)
    }

    /// Answer a credential challenge with the session's one-time password
    ///
    /// Any failure marks the connection `Disconnected` and tears the
    /// transport down. Success leaves the status alone; the transport's own
    /// `connect` notification moves it.
    pub async fn submit_credentials(&self, api: &dyn BrowserApi) -> Result<()> {
        let Some(transport) = self.handle.get() else {
            return Err(Error::NoTransport);
        };

        let delivered = match api.vnc_settings(&self.browser_id).await {
            Ok(settings) => {
                if transport.supports_credential_submission() {
                    transport.send_credentials(&settings.password)
                } else {
                    debug!(browser_id = %self.browser_id, "staging credentials on transport");
                    transport.stage_credentials(&settings.password)
                }
            }
            Err(err) => Err(err),
        };

        if let Err(err) = delivered {
            warn!(browser_id = %self.browser_id, code = err.code(), "credential flow failed: {}", err);
            self.apply(StatusInput::SetupFailed);
            teardown(transport.as_ref());
            return Err(err);
        }

        debug!(browser_id = %self.browser_id, "credentials submitted");
        Ok(())
    }

    /// User pressed close: disconnect, then return to the listing
    pub fn close(&self, navigator: &dyn Navigator, listing_route: &str) {
        if let Some(transport) = self.handle.surrender() {
            teardown(transport.as_ref());
        }
        navigator.navigate(listing_route);
    }

    /// Page is unloading
    pub fn unload(&self) {
        if let Some(transport) = self.handle.surrender() {
            teardown(transport.as_ref());
        }
    }

    fn apply(&self, input: StatusInput) -> Option<Transition> {
        let transition = self.status.borrow_mut().apply(input)?;
        info!(
            browser_id = %self.browser_id,
            from = %transition.from,
            to = %transition.to,
            "connection status changed"
        );

        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer(transition.to);
        }
        Some(transition)
    }
}

/// Best-effort disconnect; failures never reach the user
fn teardown(transport: &dyn RemoteTransport) {
    if let Err(err) = transport.disconnect() {
        debug!("ignoring transport teardown failure: {}", err);
    }
}
