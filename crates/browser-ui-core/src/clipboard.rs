//! Clipboard bridge between the local OS clipboard and the remote session
//!
//! Local access is an ordered chain of mechanisms, strongest first: the
//! async Clipboard API, then the hidden staging input. Each link either
//! yields a result or fails, and the first success short-circuits the rest.
//! Only recoverable failures fall through to the next link. When every read
//! link fails the caller opens the manual-entry dialog, which is the last
//! link and needs an explicit submit.
//!
//! The staging input is shared by both directions, so the bridge runs at
//! most one paste or copy at a time.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::status::ConnectionStatus;
use crate::transport::{paste_keystrokes, RemoteTransport};

/// Local clipboard access mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
    /// `navigator.clipboard`
    ClipboardApi,
    /// Off-screen input plus native paste / `execCommand("copy")`
    StagingInput,
    /// Visible prompt dialog
    ManualEntry,
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ClipboardApi => "clipboard-api",
            Self::StagingInput => "staging-input",
            Self::ManualEntry => "manual-entry",
        })
    }
}

/// One link of the local-read chain
#[async_trait(?Send)]
pub trait ClipboardReader {
    fn mechanism(&self) -> Mechanism;

    async fn read_text(&self) -> Result<String>;
}

/// One link of the local-write chain
#[async_trait(?Send)]
pub trait ClipboardWriter {
    fn mechanism(&self) -> Mechanism;

    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Read from the first mechanism that works
pub async fn read_first(chain: &[&dyn ClipboardReader]) -> Result<(String, Mechanism)> {
    let mut last = Error::ClipboardUnavailable("no read mechanism");
    for reader in chain {
        match reader.read_text().await {
            Ok(text) => return Ok((text, reader.mechanism())),
            Err(err) if err.is_recoverable() => {
                debug!(via = %reader.mechanism(), code = err.code(), "clipboard read fell through: {}", err);
                last = err;
            }
            Err(err) => return Err(err),
        }
    }
    Err(last)
}

/// Write through the first mechanism that works
pub async fn write_first(chain: &[&dyn ClipboardWriter], text: &str) -> Result<Mechanism> {
    let mut last = Error::ClipboardUnavailable("no write mechanism");
    for writer in chain {
        match writer.write_text(text).await {
            Ok(()) => return Ok(writer.mechanism()),
            Err(err) if err.is_recoverable() => {
                debug!(via = %writer.mechanism(), code = err.code(), "clipboard write fell through: {}", err);
                last = err;
            }
            Err(err) => return Err(err),
        }
    }
    Err(last)
}

/// Result of a local → remote paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Controls are disabled while not connected
    Disabled,
    /// Another clipboard operation holds the staging input
    Busy,
    /// Text injected and paste keystrokes sent
    Pasted { via: Mechanism },
    /// Every automatic mechanism failed; the manual dialog is now open
    ManualEntryOpened,
    /// Local read failed in a way the dialog cannot help with
    ReadFailed,
    /// Nothing to send (empty clipboard, whitespace-only submission)
    NothingToPaste,
    /// The remote clipboard rejected the text
    InjectFailed,
}

impl PasteOutcome {
    /// Hint to flash after the action, if any
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Pasted { .. } => Some("Pasted to remote"),
            _ => None,
        }
    }
}

/// Result of a remote → local copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Controls are disabled while not connected
    Disabled,
    /// Another clipboard operation holds the staging input
    Busy,
    /// No remote clipboard text observed yet
    NothingToCopy,
    /// Text placed on the local clipboard
    Copied { via: Mechanism },
    /// Every mechanism failed; swallowed
    Failed,
}

impl CopyOutcome {
    /// Hint to flash after the action, if any
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Copied { .. } => Some("Copied from remote"),
            _ => None,
        }
    }
}

/// Most recent text the remote session put on its clipboard
#[derive(Debug, Clone, Default)]
pub struct RemoteClipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl RemoteClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the snapshot with an inbound notification
    pub fn observe(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = Some(text.into());
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        self.text.borrow().is_some()
    }
}

/// State of the manual-entry dialog
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    open: bool,
    pending: String,
}

impl ManualEntry {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn open(&mut self) {
        self.open = true;
        self.pending.clear();
    }

    fn close(&mut self) -> String {
        self.open = false;
        std::mem::take(&mut self.pending)
    }
}

/// Held while a paste or copy is pending; released on drop
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Bidirectional clipboard synchronization for one session view
#[derive(Debug, Clone, Default)]
pub struct ClipboardBridge {
    remote: RemoteClipboard,
    manual: Rc<RefCell<ManualEntry>>,
    busy: Rc<Cell<bool>>,
}

impl ClipboardBridge {
    #[must_use]
    pub fn new(remote: RemoteClipboard) -> Self {
        Self {
            remote,
            manual: Rc::default(),
            busy: Rc::default(),
        }
    }

    #[must_use]
    pub fn remote(&self) -> &RemoteClipboard {
        &self.remote
    }

    /// Both clipboard controls share this rule
    #[must_use]
    pub fn controls_enabled(status: ConnectionStatus) -> bool {
        status.is_connected()
    }

    /// A paste or copy is waiting on a local mechanism
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    #[must_use]
    pub fn manual_entry(&self) -> ManualEntry {
        self.manual.borrow().clone()
    }

    /// Local → remote through the automatic chain
    ///
    /// `status` is read again once the local read settles; a session that
    /// dropped while the chain waited on the user gets nothing.
    pub async fn paste_to_remote(
        &self,
        status: &dyn Fn() -> ConnectionStatus,
        transport: &dyn RemoteTransport,
        readers: &[&dyn ClipboardReader],
    ) -> PasteOutcome {
        if !Self::controls_enabled(status()) {
            return PasteOutcome::Disabled;
        }
        let Some(_guard) = InFlight::acquire(&self.busy) else {
            debug!("clipboard operation already in flight");
            return PasteOutcome::Busy;
        };

        let read = read_first(readers).await;
        if !Self::controls_enabled(status()) {
            debug!("session left Connected during local read, dropping paste");
            return PasteOutcome::Disabled;
        }

        match read {
            Ok((text, via)) if text.is_empty() => {
                debug!(%via, "local clipboard is empty");
                PasteOutcome::NothingToPaste
            }
            Ok((text, via)) => self.inject(transport, &text, via),
            Err(err) if err.is_recoverable() => {
                info!(code = err.code(), "no automatic clipboard access, opening manual entry");
                self.manual.borrow_mut().open();
                PasteOutcome::ManualEntryOpened
            }
            Err(err) => {
                warn!(code = err.code(), "local clipboard read failed: {}", err);
                PasteOutcome::ReadFailed
            }
        }
    }

    /// Text typed into the dialog field
    pub fn set_manual_text(&self, text: impl Into<String>) {
        let mut manual = self.manual.borrow_mut();
        if manual.open {
            manual.pending = text.into();
        }
    }

    /// Paste event on the dialog field; the field is pre-selected, so the
    /// pasted text replaces its content instead of being inserted twice
    pub fn capture_manual_paste(&self, text: impl Into<String>) {
        self.set_manual_text(text);
    }

    /// Close the dialog without sending anything
    pub fn cancel_manual(&self) {
        self.manual.borrow_mut().close();
    }

    /// Submit the dialog; whitespace-only input only closes it
    pub fn submit_manual(
        &self,
        status: ConnectionStatus,
        transport: &dyn RemoteTransport,
    ) -> PasteOutcome {
        let text = {
            let mut manual = self.manual.borrow_mut();
            if !manual.open {
                return PasteOutcome::NothingToPaste;
            }
            manual.close()
        };

        if text.trim().is_empty() {
            return PasteOutcome::NothingToPaste;
        }
        if !Self::controls_enabled(status) {
            return PasteOutcome::Disabled;
        }
        self.inject(transport, &text, Mechanism::ManualEntry)
    }

    /// Remote → local
    pub async fn copy_to_local(
        &self,
        status: ConnectionStatus,
        writers: &[&dyn ClipboardWriter],
    ) -> CopyOutcome {
        if !Self::controls_enabled(status) {
            return CopyOutcome::Disabled;
        }
        let Some(text) = self.remote.snapshot() else {
            return CopyOutcome::NothingToCopy;
        };
        let Some(_guard) = InFlight::acquire(&self.busy) else {
            debug!("clipboard operation already in flight");
            return CopyOutcome::Busy;
        };

        match write_first(writers, &text).await {
            Ok(via) => CopyOutcome::Copied { via },
            Err(err) => {
                debug!(code = err.code(), "ignoring local clipboard write failure: {}", err);
                CopyOutcome::Failed
            }
        }
    }

    /// Fill the remote clipboard buffer, then press Ctrl+V inside the session
    fn inject(&self, transport: &dyn RemoteTransport, text: &str, via: Mechanism) -> PasteOutcome {
        if let Err(err) = transport.clipboard_paste_from(text) {
            warn!(%via, "remote clipboard injection failed: {}", err);
            return PasteOutcome::InjectFailed;
        }

        // the buffer alone is enough for some remote applications
        for (keysym, code, down) in paste_keystrokes() {
            if let Err(err) = transport.send_key(keysym, code, down) {
                debug!(code, down, "ignoring paste keystroke failure: {}", err);
                break;
            }
        }

        debug!(%via, chars = text.chars().count(), "pasted into remote session");
        PasteOutcome::Pasted { via }
    }
}
