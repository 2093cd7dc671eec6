//! Browser UI Core - session view state machines
//!
//! Platform-neutral logic behind the remote browser session viewer:
//! - Bootstrap: resolve a session's start time once
//! - Uptime: elapsed-time display that freezes on disconnect
//! - Status / Controller: transport lifecycle and credential flow
//! - Viewport: desktop-size requests and local scaling
//! - Clipboard: local ↔ remote text with layered fallbacks
//! - Dashboard: listing order, header stats, browser badges
//!
//! Everything runs on a single-threaded event loop; browser facilities are
//! reached through the traits in [`api`], [`transport`], [`clipboard`] and
//! [`controller`], which the web app implements with web-sys.
//!
//! ## Usage
//!
//! ```ignore
//! use browser_ui_core::{ConnectionController, RemoteClipboard, TransportEvent, UiConfig};
//!
//! let config = UiConfig::load(None)?;
//! let remote = RemoteClipboard::new();
//! let controller = ConnectionController::new("abc123", config.transport.clone(), remote);
//! controller.mount(|| make_rfb_transport())?;
//! controller.dispatch(TransportEvent::Connect);
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod bootstrap;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod hint;
pub mod lifecycle;
pub mod status;
pub mod transport;
pub mod uptime;
pub mod viewport;

pub use api::{ApiPaths, BrowserApi, PageOrigin, Password, SessionPhase, SessionSummary, VncSettings};
pub use bootstrap::{SessionBootstrap, StartSource};
pub use clipboard::{
    ClipboardBridge, ClipboardReader, ClipboardWriter, CopyOutcome, Mechanism, PasteOutcome,
    RemoteClipboard,
};
pub use self::config::UiConfig;
pub use controller::{ConnectionController, Dispatched, Navigator};
pub use error::{Error, ErrorKind, Result};
pub use hint::{HintSlot, HintTicket};
pub use lifecycle::{HandleSlot, MountScope};
pub use status::{ConnectionStatus, StatusInput, StatusMachine, Transition};
pub use transport::{RemoteTransport, TransportEvent, TransportOptions};
pub use uptime::{format_uptime, UptimeClock, UPTIME_PLACEHOLDER};
pub use viewport::{Bounds, SizingOutcome, ViewportSizer};
