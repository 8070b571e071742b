//! In-memory storage backend.
//! Fastest option but not persistent across page reloads.
//! An optional quota makes it reject oversized values the way
//! localStorage does.

use std::cell::RefCell;
use std::collections::HashMap;
use studio_core::ports::StoragePort;
use studio_types::{Result, StorageError};

pub struct MemoryStorage {
    data: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            quota: None,
        }
    }

    /// Reject any write that would push total stored bytes past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.data
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { bytes: value.len() });
            }
        }
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
