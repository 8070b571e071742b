use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use studio_types::{Result, StudioError};

/// Save `uri` to the user's machine as `file_name` via a transient anchor.
pub fn trigger_download(uri: &str, file_name: &str) -> Result<()> {
    let anchor: HtmlAnchorElement = gloo_utils::document()
        .create_element("a")
        .map_err(|e| StudioError::JsInterop(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| StudioError::JsInterop(format!("{:?}", e)))?;
    anchor.set_href(uri);
    anchor.set_download(file_name);
    anchor.click();
    log::info!("Download started: {}", file_name);
    Ok(())
}
