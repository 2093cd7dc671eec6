//! noVNC `RFB` bindings
//!
//! The page loads noVNC as an ES module and publishes the class on
//! `window.RFB` (see `index.html`). Everything here goes through that global.

use std::rc::Rc;

use browser_ui_core::transport::SUBSCRIBED_EVENTS;
use browser_ui_core::{Error, Password, RemoteTransport, Result, TransportEvent, TransportOptions};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, Element, Event, EventTarget};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = RFB, extends = EventTarget)]
    #[derive(Debug, Clone)]
    pub type Rfb;

    #[wasm_bindgen(constructor, js_class = "RFB", catch)]
    fn new(target: &Element, url: &str) -> std::result::Result<Rfb, JsValue>;

    #[wasm_bindgen(method, js_class = "RFB", setter = scaleViewport)]
    fn set_scale_viewport(this: &Rfb, value: bool);

    #[wasm_bindgen(method, js_class = "RFB", setter = resizeSession)]
    fn set_resize_session(this: &Rfb, value: bool);

    #[wasm_bindgen(method, js_class = "RFB", setter = localCursor)]
    fn set_local_cursor(this: &Rfb, value: bool);

    #[wasm_bindgen(method, js_class = "RFB", setter = clipViewport)]
    fn set_clip_viewport(this: &Rfb, value: bool);

    #[wasm_bindgen(method, js_class = "RFB", setter = dragViewport)]
    fn set_drag_viewport(this: &Rfb, value: bool);

    #[wasm_bindgen(method, js_class = "RFB", setter = viewOnly)]
    fn set_view_only(this: &Rfb, value: bool);

    #[wasm_bindgen(method, js_class = "RFB", catch)]
    fn disconnect(this: &Rfb) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "RFB", catch, js_name = sendCredentials)]
    fn send_credentials(this: &Rfb, credentials: &JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "RFB", catch, js_name = requestDesktopSize)]
    fn request_desktop_size(this: &Rfb, width: u32, height: u32) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "RFB", catch, js_name = clipboardPasteFrom)]
    fn clipboard_paste_from(this: &Rfb, text: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "RFB", catch, js_name = sendKey)]
    fn send_key(this: &Rfb, keysym: u32, code: &str, down: bool) -> std::result::Result<(), JsValue>;
}

/// Property older noVNC builds read credentials from
const STAGED_CREDENTIALS: &str = "_rfb_credentials";

/// [`RemoteTransport`] backed by a live noVNC client
pub struct RfbTransport {
    rfb: Rfb,
}

impl RfbTransport {
    /// Construct the client on `target` and register every listener
    ///
    /// Listeners are attached before this returns, so no notification can
    /// arrive ahead of them.
    pub fn connect<F>(target: &Element, url: &str, on_event: F) -> Result<Rc<dyn RemoteTransport>>
    where
        F: Fn(TransportEvent) + 'static,
    {
        let rfb = Rfb::new(target, url).map_err(js_error)?;
        let on_event = Rc::new(on_event);

        for name in SUBSCRIBED_EVENTS {
            let handler = Rc::clone(&on_event);
            let listener = Closure::wrap(Box::new(move |event: Event| {
                if let Some(decoded) = decode_event(name, &event) {
                    handler(decoded);
                }
            }) as Box<dyn Fn(Event)>);

            rfb.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .map_err(js_error)?;
            // the client lives as long as the page
            listener.forget();
        }

        tracing::debug!(url, "RFB client constructed");
        Ok(Rc::new(Self { rfb }))
    }

    fn has_method(&self, name: &str) -> bool {
        Reflect::get(&self.rfb, &JsValue::from_str(name))
            .map(|value| value.is_function())
            .unwrap_or(false)
    }
}

impl RemoteTransport for RfbTransport {
    fn configure(&self, options: &TransportOptions) -> Result<()> {
        self.rfb.set_scale_viewport(options.scale_viewport);
        self.rfb.set_resize_session(options.resize_session);
        self.rfb.set_local_cursor(options.local_cursor);
        self.rfb.set_clip_viewport(options.clip_viewport);
        self.rfb.set_drag_viewport(options.drag_viewport);
        self.rfb.set_view_only(options.view_only);
        Ok(())
    }

    fn supports_credential_submission(&self) -> bool {
        self.has_method("sendCredentials")
    }

    fn send_credentials(&self, password: &Password) -> Result<()> {
        let credentials = credentials_object(password)?;
        self.rfb.send_credentials(&credentials).map_err(js_error)
    }

    fn stage_credentials(&self, password: &Password) -> Result<()> {
        let credentials = credentials_object(password)?;
        Reflect::set(&self.rfb, &JsValue::from_str(STAGED_CREDENTIALS), &credentials)
            .map_err(js_error)?;
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        self.rfb.disconnect().map_err(js_error)
    }

    fn supports_desktop_resize(&self) -> bool {
        self.has_method("requestDesktopSize")
    }

    fn request_desktop_size(&self, width: u32, height: u32) -> Result<()> {
        if !self.supports_desktop_resize() {
            return Err(Error::TransportUnsupported("requestDesktopSize"));
        }
        self.rfb.request_desktop_size(width, height).map_err(js_error)
    }

    fn set_scale_viewport(&self, enabled: bool) -> Result<()> {
        self.rfb.set_scale_viewport(enabled);
        Ok(())
    }

    fn clipboard_paste_from(&self, text: &str) -> Result<()> {
        self.rfb.clipboard_paste_from(text).map_err(js_error)
    }

    fn send_key(&self, keysym: u32, code: &str, down: bool) -> Result<()> {
        self.rfb.send_key(keysym, code, down).map_err(js_error)
    }
}

/// Map a DOM notification onto a [`TransportEvent`]
fn decode_event(name: &str, event: &Event) -> Option<TransportEvent> {
    let detail = event
        .dyn_ref::<CustomEvent>()
        .map(CustomEvent::detail)
        .unwrap_or(JsValue::UNDEFINED);

    match name {
        "credentialsrequired" => Some(TransportEvent::CredentialsRequired),
        "connect" => Some(TransportEvent::Connect),
        "disconnect" => {
            let clean = detail_field(&detail, "clean")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Some(TransportEvent::Disconnect { clean })
        }
        "clipboard" => detail_field(&detail, "text")
            .and_then(|v| v.as_string())
            .map(TransportEvent::Clipboard),
        _ => None,
    }
}

fn detail_field(detail: &JsValue, key: &str) -> Option<JsValue> {
    if !detail.is_object() {
        return None;
    }
    Reflect::get(detail, &JsValue::from_str(key)).ok()
}

fn credentials_object(password: &Password) -> Result<JsValue> {
    let credentials = Object::new();
    Reflect::set(
        &credentials,
        &JsValue::from_str("password"),
        &JsValue::from_str(password.expose()),
    )
    .map_err(js_error)?;
    Ok(credentials.into())
}

fn js_error(err: JsValue) -> Error {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    Error::transport(message)
}
