//! localStorage backend.
//! Persistent across page reloads; writes are synchronous and fail with a
//! quota DOMException once the origin's budget (typically ~5 MB) is used.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use studio_core::ports::StoragePort;
use studio_types::{Result, StorageError, StudioError};

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open the window's localStorage. Fails in private modes that block it.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StudioError::JsInterop("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StudioError::JsInterop(format!("{:?}", e)))?
            .ok_or_else(|| StudioError::Config("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StudioError::JsInterop(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| classify_write_error(&e, value.len()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StudioError::JsInterop(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}

/// Quota failures are reported under different names and legacy codes
/// depending on the browser.
pub fn is_quota_error(name: &str, code: u16) -> bool {
    matches!(name, "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED")
        || code == 22
        || code == 1014
}

fn classify_write_error(err: &JsValue, bytes: usize) -> StorageError {
    match err.dyn_ref::<DomException>() {
        Some(ex) if is_quota_error(&ex.name(), ex.code()) => StorageError::QuotaExceeded { bytes },
        Some(ex) => StorageError::Other(format!("{}: {}", ex.name(), ex.message())),
        None => StorageError::Other(format!("{:?}", err)),
    }
}
