//! History store: the bounded, persisted library of past results.
//!
//! Persistence writes the whole list as one JSON blob under a single key.
//! When the backend reports a quota failure the oldest record is dropped and
//! the write retried, so the durable list is always a newest-first prefix of
//! what was requested. `records()` only ever returns what was confirmed
//! written.

use std::rc::Rc;

use studio_types::{
    config::HistoryConfig, history::HistoryRecord, Result, StorageError,
};

use crate::ports::StoragePort;

/// Result of one persistence cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistOutcome {
    /// The sequence that is now durable
    pub accepted: Vec<HistoryRecord>,
    /// Records dropped from the tail to fit
    pub pruned: usize,
    /// Set when the cycle ended without writing the full candidate
    pub error: Option<StorageError>,
}

impl PersistOutcome {
    pub fn contains(&self, id: &str) -> bool {
        self.accepted.iter().any(|r| r.id == id)
    }
}

/// Write `candidate`, dropping the oldest record on each quota failure.
///
/// Stops at the first successful write, at the first non-quota failure
/// (accepted is then empty), or when even the empty list does not fit.
pub fn prune_and_persist<W>(mut candidate: Vec<HistoryRecord>, mut write: W) -> PersistOutcome
where
    W: FnMut(&[HistoryRecord]) -> std::result::Result<(), StorageError>,
{
    let mut pruned = 0;
    loop {
        match write(&candidate) {
            Ok(()) => {
                return PersistOutcome {
                    accepted: candidate,
                    pruned,
                    error: None,
                }
            }
            Err(e) if e.is_capacity() => match candidate.pop() {
                Some(dropped) => {
                    pruned += 1;
                    log::warn!(
                        "History write over quota, pruning oldest record {} ({} left)",
                        dropped.id,
                        candidate.len()
                    );
                }
                None => {
                    return PersistOutcome {
                        accepted: Vec::new(),
                        pruned,
                        error: Some(e),
                    }
                }
            },
            Err(e) => {
                return PersistOutcome {
                    accepted: Vec::new(),
                    pruned,
                    error: Some(e),
                }
            }
        }
    }
}

/// Prepend `record`, drop any older entry with the same image, cap length.
pub fn merge_record(
    history: &[HistoryRecord],
    record: &HistoryRecord,
    max_items: usize,
) -> Vec<HistoryRecord> {
    std::iter::once(record.clone())
        .chain(
            history
                .iter()
                .filter(|r| r.image_uri != record.image_uri)
                .cloned(),
        )
        .take(max_items)
        .collect()
}

pub struct HistoryStore {
    storage: Rc<dyn StoragePort>,
    key: String,
    max_items: usize,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new(storage: Rc<dyn StoragePort>, key: impl Into<String>, max_items: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            max_items: max_items.max(1),
            records: Vec::new(),
        }
    }

    pub fn from_config(storage: Rc<dyn StoragePort>, config: &HistoryConfig) -> Self {
        Self::new(storage, config.storage_key.clone(), config.max_items)
    }

    /// Confirmed (durable) records, newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn backend_name(&self) -> &str {
        self.storage.backend_name()
    }

    /// Read the durable key. Malformed content is discarded and the key
    /// cleared; read errors yield an empty history. Duplicates and records
    /// past the cap are dropped and the trimmed list written back.
    pub fn load(&mut self) -> Vec<HistoryRecord> {
        self.records = match self.storage.get(&self.key) {
            Ok(Some(text)) => match serde_json::from_str::<Vec<HistoryRecord>>(&text) {
                Ok(records) => {
                    let stored = records.len();
                    let mut normalized: Vec<HistoryRecord> = Vec::with_capacity(stored);
                    for record in records {
                        if !normalized.iter().any(|r| r.image_uri == record.image_uri) {
                            normalized.push(record);
                        }
                    }
                    normalized.truncate(self.max_items);
                    if normalized.len() < stored {
                        log::info!(
                            "Normalized stored history from {} to {} records",
                            stored,
                            normalized.len()
                        );
                        if let Err(e) = write_records(self.storage.as_ref(), &self.key, &normalized) {
                            log::warn!("Failed to rewrite normalized history: {}", e);
                        }
                    }
                    normalized
                }
                Err(e) => {
                    log::warn!("Discarding malformed history under {}: {}", self.key, e);
                    if let Err(e) = self.storage.delete(&self.key) {
                        log::error!("Failed to clear malformed history: {}", e);
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("History unavailable ({}), starting empty", e);
                Vec::new()
            }
        };
        log::info!(
            "History loaded: {} records from {}",
            self.records.len(),
            self.storage.backend_name()
        );
        self.records.clone()
    }

    /// Optimistic candidate for `record`; nothing is written.
    pub fn stage(&self, record: &HistoryRecord) -> Vec<HistoryRecord> {
        merge_record(&self.records, record, self.max_items)
    }

    /// Merge `record` into the confirmed history and persist.
    ///
    /// On a non-quota failure the durable key still holds the previous list,
    /// so `accepted` reports that list and in-memory state is left on it.
    pub fn append(&mut self, record: HistoryRecord) -> PersistOutcome {
        let candidate = self.stage(&record);
        let storage = self.storage.clone();
        let key = self.key.clone();
        let mut outcome = prune_and_persist(candidate, |records| {
            write_records(storage.as_ref(), &key, records)
        });

        match &outcome.error {
            None => {
                if outcome.pruned > 0 {
                    log::warn!(
                        "History pruned by {} to fit storage ({} kept)",
                        outcome.pruned,
                        outcome.accepted.len()
                    );
                }
                self.records = outcome.accepted.clone();
            }
            Some(e) if e.is_capacity() => {
                log::error!("History does not fit in storage even when empty: {}", e);
                if let Err(e) = self.storage.delete(&self.key) {
                    log::error!("Failed to clear history key: {}", e);
                }
                self.records.clear();
            }
            Some(e) => {
                log::error!("History write failed: {}", e);
                outcome.accepted = self.records.clone();
            }
        }
        outcome
    }

    /// Empty in-memory and durable history. In-memory state is cleared even
    /// when the durable delete fails.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.storage.delete(&self.key)
    }
}

fn write_records(
    storage: &dyn StoragePort,
    key: &str,
    records: &[HistoryRecord],
) -> std::result::Result<(), StorageError> {
    let json = serde_json::to_string(records).map_err(|e| StorageError::Other(e.to_string()))?;
    storage.set(key, &json)
}
