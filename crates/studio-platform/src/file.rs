//! Reading user-chosen files into memory.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{EventTarget, File, HtmlInputElement};

use studio_types::{image::FileBlob, Result, StudioError};

fn js_err(e: JsValue) -> StudioError {
    StudioError::JsInterop(format!("{:?}", e))
}

/// Read a browser `File` into bytes.
pub async fn read_file(file: &File) -> Result<FileBlob> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_err)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(FileBlob {
        name: file.name(),
        mime_type: file.type_(),
        bytes,
    })
}

/// Listens for the first `change` or `cancel` on a target. Listeners stay
/// attached only while this value lives.
pub struct PendingSelection<'a> {
    rx: oneshot::Receiver<bool>,
    _change: Listener<'a>,
    _cancel: Listener<'a>,
}

impl<'a> PendingSelection<'a> {
    pub fn listen(target: &'a EventTarget) -> Result<Self> {
        let (tx, rx) = oneshot::channel::<bool>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let settle = |changed: bool| {
            let tx = tx.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(changed);
                }
            })
        };
        Ok(Self {
            rx,
            _change: Listener::attach(target, "change", settle(true))?,
            _cancel: Listener::attach(target, "cancel", settle(false))?,
        })
    }

    /// `true` if a change arrived first. Listeners are detached on return.
    pub async fn wait(self) -> bool {
        let Self { rx, _change, _cancel } = self;
        rx.await.unwrap_or(false)
    }
}

struct Listener<'a> {
    target: &'a EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl<'a> Listener<'a> {
    fn attach(
        target: &'a EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Result<Self> {
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(js_err)?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for Listener<'_> {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Open the native file chooser restricted to images.
/// Resolves to `None` when the user cancels.
pub async fn pick_image_file() -> Result<Option<FileBlob>> {
    let input: HtmlInputElement = gloo_utils::document()
        .create_element("input")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|e| js_err(e.into()))?;
    input.set_type("file");
    input.set_accept("image/*");

    let selection = PendingSelection::listen(input.as_ref())?;
    input.click();
    if !selection.wait().await {
        return Ok(None);
    }

    match input.files().and_then(|list| list.get(0)) {
        Some(file) => read_file(&file).await.map(Some),
        None => Ok(None),
    }
}
