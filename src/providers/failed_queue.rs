//! Durable queue of entries the remote provider could not deliver
//!
//! Stored as one JSON array under a single key. Every operation performs
//! its whole read-transform-write while holding the queue mutex, so the
//! log-triggered flush, the flush ticker and the retry ticker can touch
//! the queue concurrently without losing each other's updates.

use crate::core::{diagnostics, LogEntry, Result};
use crate::storage::{self, KeyValueStore, FAILED_LOGS_KEY};
use parking_lot::Mutex;
use std::sync::Arc;

/// Maximum entries kept in the queue; older entries are evicted first
pub const DEFAULT_MAX_FAILED_ENTRIES: usize = 500;

pub struct FailedQueue {
    store: Arc<dyn KeyValueStore>,
    key: String,
    max_entries: usize,
    guard: Mutex<()>,
}

impl FailedQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, DEFAULT_MAX_FAILED_ENTRIES)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            store,
            key: FAILED_LOGS_KEY.to_string(),
            max_entries,
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Snapshot of the parked entries, oldest first
    pub fn load(&self) -> Vec<LogEntry> {
        let _guard = self.guard.lock();
        storage::read_entries(self.store.as_ref(), &self.key)
    }

    /// Park `entries` after any already queued, evicting the oldest beyond
    /// capacity. Returns the number of entries evicted.
    pub fn append(&self, entries: &[LogEntry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        let _guard = self.guard.lock();
        let mut queued = storage::read_entries(self.store.as_ref(), &self.key);
        queued.extend_from_slice(entries);
        let evicted = queued.len().saturating_sub(self.max_entries);
        storage::write_entries(self.store.as_ref(), &self.key, &mut queued, self.max_entries)?;
        if evicted > 0 {
            diagnostics::warn(format!(
                "Failed-delivery queue full, evicted {} oldest entries",
                evicted
            ));
        }
        Ok(evicted)
    }

    /// Drop entries the intake has accepted, oldest match first.
    ///
    /// Entries parked after `delivered` was read stay queued in order, and
    /// entries already evicted are skipped.
    pub fn remove_delivered(&self, delivered: &[LogEntry]) -> Result<()> {
        if delivered.is_empty() {
            return Ok(());
        }
        let _guard = self.guard.lock();
        let mut queued = storage::read_entries(self.store.as_ref(), &self.key);
        let before = queued.len();
        for entry in delivered {
            if let Some(position) = queued.iter().position(|q| q == entry) {
                queued.remove(position);
            }
        }
        if queued.len() == before {
            return Ok(());
        }
        if queued.is_empty() {
            self.store.remove(&self.key)
        } else {
            storage::write_entries(self.store.as_ref(), &self.key, &mut queued, self.max_entries)
        }
    }

    pub fn clear(&self) -> Result<()> {
        let _guard = self.guard.lock();
        self.store.remove(&self.key)
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
