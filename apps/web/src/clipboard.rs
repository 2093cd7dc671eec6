//! Browser clipboard mechanisms
//!
//! Links of the read/write chains driven by [`browser_ui_core::ClipboardBridge`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use browser_ui_core::{ClipboardReader, ClipboardWriter, Error, Mechanism, Result};
use futures::channel::oneshot;
use futures::future::{select, Either};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{ClipboardEvent, HtmlDocument, HtmlInputElement};

use crate::config::millis;

/// `navigator.clipboard`
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncClipboard;

impl AsyncClipboard {
    /// The clipboard object, if this browser exposes `method` on it
    fn with_method(method: &'static str) -> Result<web_sys::Clipboard> {
        let navigator = web_sys::window()
            .ok_or(Error::ClipboardUnavailable("window"))?
            .navigator();

        // absent on insecure origins
        let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .ok()
            .filter(|value| value.is_object())
            .ok_or(Error::ClipboardUnavailable("navigator.clipboard"))?;

        let present = Reflect::get(&clipboard, &JsValue::from_str(method))
            .map(|value| value.is_function())
            .unwrap_or(false);
        if !present {
            return Err(Error::ClipboardUnavailable(method));
        }

        Ok(clipboard.unchecked_into())
    }
}

#[async_trait(?Send)]
impl ClipboardReader for AsyncClipboard {
    fn mechanism(&self) -> Mechanism {
        Mechanism::ClipboardApi
    }

    async fn read_text(&self) -> Result<String> {
        let clipboard = Self::with_method("readText")?;
        let text = settle(clipboard.read_text()).await?;
        Ok(text.as_string().unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl ClipboardWriter for AsyncClipboard {
    fn mechanism(&self) -> Mechanism {
        Mechanism::ClipboardApi
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let clipboard = Self::with_method("writeText")?;
        settle(clipboard.write_text(text)).await?;
        Ok(())
    }
}

/// Off-screen input used when the async API is missing or denied
#[derive(Clone)]
pub struct StagingInput {
    input: HtmlInputElement,
    capture: Duration,
    on_armed: Option<Rc<dyn Fn()>>,
}

impl StagingInput {
    pub fn new(input: HtmlInputElement, capture: Duration) -> Self {
        Self {
            input,
            capture,
            on_armed: None,
        }
    }

    /// Called once the input is focused and waiting for the paste gesture
    #[must_use]
    pub fn on_armed(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_armed = Some(Rc::new(callback));
        self
    }

    fn focus_and_select(&self) -> Result<()> {
        self.input
            .focus()
            .map_err(|_| Error::ClipboardUnavailable("staging input focus"))?;
        self.input.select();
        Ok(())
    }
}

#[async_trait(?Send)]
impl ClipboardReader for StagingInput {
    fn mechanism(&self) -> Mechanism {
        Mechanism::StagingInput
    }

    async fn read_text(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel::<String>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let sender = Rc::clone(&tx);
        let on_paste = Closure::wrap(Box::new(move |event: ClipboardEvent| {
            event.prevent_default();
            let text = event
                .clipboard_data()
                .and_then(|data| data.get_data("text/plain").ok())
                .unwrap_or_default();
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(text);
            }
        }) as Box<dyn Fn(ClipboardEvent)>);

        self.input
            .add_event_listener_with_callback("paste", on_paste.as_ref().unchecked_ref())
            .map_err(|_| Error::ClipboardUnavailable("staging input paste listener"))?;

        self.input.set_value("");
        let armed = self.focus_and_select();
        if armed.is_ok() {
            if let Some(callback) = &self.on_armed {
                callback();
            }
        }

        let result = match armed {
            Err(err) => Err(err),
            Ok(()) => {
                let timeout = TimeoutFuture::new(millis(self.capture));
                match select(rx, Box::pin(timeout)).await {
                    Either::Left((Ok(text), _)) => Ok(text),
                    Either::Left((Err(_), _)) | Either::Right(_) => Err(Error::PasteTimeout),
                }
            }
        };

        let _ = self
            .input
            .remove_event_listener_with_callback("paste", on_paste.as_ref().unchecked_ref());
        let _ = self.input.blur();
        self.input.set_value("");
        result
    }
}

#[async_trait(?Send)]
impl ClipboardWriter for StagingInput {
    fn mechanism(&self) -> Mechanism {
        Mechanism::StagingInput
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        self.input.set_value(text);
        self.focus_and_select()?;

        let document: HtmlDocument = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
            .ok_or(Error::ClipboardUnavailable("document"))?;

        let copied = document.exec_command("copy").unwrap_or(false);
        let _ = self.input.blur();
        self.input.set_value("");

        if copied {
            Ok(())
        } else {
            Err(Error::clipboard_denied("execCommand(\"copy\") refused"))
        }
    }
}

async fn settle(promise: Promise) -> Result<JsValue> {
    JsFuture::from(promise).await.map_err(|err| {
        let name = Reflect::get(&err, &JsValue::from_str("name"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| "clipboard error".to_string());
        Error::clipboard_denied(name)
    })
}
