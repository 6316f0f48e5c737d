//! Provider trait for log output sinks

use super::{error::Result, log_entry::LogEntry};

/// Optional operations a provider actually implements.
///
/// The dispatcher consults this before calling `flush` or `cleanup`, so
/// providers that leave those as defaults are never invoked for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    pub batch: bool,
    pub flush: bool,
    pub cleanup: bool,
}

impl ProviderCapabilities {
    pub const NONE: ProviderCapabilities = ProviderCapabilities {
        batch: false,
        flush: false,
        cleanup: false,
    };

    pub const ALL: ProviderCapabilities = ProviderCapabilities {
        batch: true,
        flush: true,
        cleanup: true,
    };
}

/// An output sink registered with a [`Logger`](super::Logger).
///
/// Implementations keep their own mutable state behind interior
/// mutability; every method takes `&self` so the dispatcher can fan out
/// without exclusive access to the registry.
///
/// `log` must never block on I/O for long and must be a no-op when the
/// provider is not ready (before `initialize` or after `cleanup`).
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    fn log(&self, entry: &LogEntry) -> Result<()>;

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::NONE
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn log_batch(&self, entries: &[LogEntry]) -> Result<()> {
        for entry in entries {
            self.log(entry)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}
