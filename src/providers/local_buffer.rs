//! Local buffer provider
//!
//! Keeps a bounded copy of recent entries in the durable store so the app
//! can show or export them (see [`Logger::get_logs`](crate::Logger::get_logs)).
//! It is independent of the remote provider's failed-delivery queue.

use crate::core::{LogEntry, Provider, Result};
use crate::storage::{self, KeyValueStore, LOCAL_LOGS_KEY};
use parking_lot::Mutex;
use std::sync::Arc;

pub const DEFAULT_LOCAL_BUFFER_SIZE: usize = 1000;

pub struct LocalBufferProvider {
    store: Arc<dyn KeyValueStore>,
    max_entries: usize,
    guard: Mutex<()>,
}

impl LocalBufferProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, DEFAULT_LOCAL_BUFFER_SIZE)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            store,
            max_entries,
            guard: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}

impl Provider for LocalBufferProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn log(&self, entry: &LogEntry) -> Result<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    fn log_batch(&self, entries: &[LogEntry]) -> Result<()> {
        let _guard = self.guard.lock();
        let mut stored = storage::read_entries(self.store.as_ref(), LOCAL_LOGS_KEY);
        stored.extend_from_slice(entries);
        storage::write_entries(self.store.as_ref(), LOCAL_LOGS_KEY, &mut stored, self.max_entries)
    }
}
