//! Select the storage backend named in the config.
//!
//! Auto: localStorage → Memory (fallback).

use std::rc::Rc;
use studio_core::ports::StoragePort;
use studio_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Open the requested backend, falling back to memory when localStorage
/// cannot be opened. Returns a trait object so callers are backend-agnostic.
pub fn open_storage(backend: StorageBackendType) -> Rc<dyn StoragePort> {
    match backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory");
            Rc::new(MemoryStorage::new())
        }
        StorageBackendType::Auto | StorageBackendType::LocalStorage => match LocalStorage::open() {
            Ok(local) => {
                log::info!("Storage backend: localStorage");
                Rc::new(local)
            }
            Err(e) => {
                log::warn!("localStorage unavailable ({}), falling back to memory", e);
                Rc::new(MemoryStorage::new())
            }
        },
    }
}
