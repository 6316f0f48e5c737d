//! Durable key-value storage used for the local log buffer and the
//! failed-delivery queue

pub mod memory;

#[cfg(feature = "file")]
pub mod file;

pub use memory::MemoryStore;

#[cfg(feature = "file")]
pub use file::FileStore;

use crate::core::{diagnostics, LogEntry, Result};

/// Key under which undelivered remote batches are parked
pub const FAILED_LOGS_KEY: &str = "pettrack_failed_logs";

/// Key under which the local log buffer is kept
pub const LOCAL_LOGS_KEY: &str = "pettrack_logs";

/// String key-value storage that survives process restarts.
///
/// An absent key is `Ok(None)`, never an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read a JSON array of entries, treating every failure as empty.
///
/// Absent keys are silently empty; unreadable stores and corrupt JSON are
/// reported on the diagnostic channel.
pub(crate) fn read_entries(store: &dyn KeyValueStore, key: &str) -> Vec<LogEntry> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<LogEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                diagnostics::warn(format!("Discarding unreadable log data under '{}': {}", key, e));
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            diagnostics::warn(format!("Failed to read '{}': {}", key, e));
            Vec::new()
        }
    }
}

/// Serialize and store `entries`, keeping only the newest `cap`.
pub(crate) fn write_entries(
    store: &dyn KeyValueStore,
    key: &str,
    entries: &mut Vec<LogEntry>,
    cap: usize,
) -> Result<()> {
    if entries.len() > cap {
        let excess = entries.len() - cap;
        entries.drain(..excess);
    }
    let json = serde_json::to_string(entries)?;
    store.set(key, &json)
}
