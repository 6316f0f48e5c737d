//! # PetTrack Logger
//!
//! Pluggable logging core for the PetTrack mobile app.
//!
//! A single [`Logger`] filters entries by level, stamps them with
//! process metadata and fans them out to registered [`Provider`]s. A
//! failing provider never affects the others or the caller.
//!
//! ## Providers
//!
//! - **Console**: human-readable lines in development, JSON lines in production
//! - **Local buffer**: a bounded copy of recent entries in the durable store
//! - **Remote**: batches entries, ships them over HTTP and parks failed
//!   deliveries in a durable queue that is retried on a timer
//!
//! ## Example
//!
//! ```
//! use pettrack_logger::prelude::*;
//! use pettrack_logger::info;
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .provider(ConsoleProvider::new())
//!     .build();
//!
//! info!(logger, "Tracking {} pets", 3);
//! let walks = logger.child(LogContext::new().with_field("screen", "walks"));
//! walks.warn("GPS accuracy degraded");
//! ```

pub mod config;
pub mod core;
pub mod macros;
pub mod providers;
pub mod storage;
pub mod transport;

pub mod prelude {
    pub use crate::config::{Environment, LoggerConfig};
    pub use crate::core::{
        ChildLogger, EntryMetadata, ErrorInfo, LogContext, LogEntry, LogLevel, LogStats, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Provider, ProviderCapabilities,
        ProviderFailure, Result,
    };
    pub use crate::providers::{ConsoleFormat, ConsoleProvider, LocalBufferProvider, RemoteConfig, RemoteProvider};
    pub use crate::storage::{KeyValueStore, MemoryStore};
    pub use crate::transport::HttpTransport;
}

pub use config::{Environment, LoggerConfig};
pub use crate::core::{
    diagnostics_enabled, set_diagnostics_enabled, ChildLogger, EntryMetadata, ErrorInfo,
    LogContext, LogEntry, LogLevel, LogStats, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    Provider, ProviderCapabilities, ProviderFailure, Result,
};
pub use providers::{
    ConsoleFormat, ConsoleProvider, FailedQueue, LocalBufferProvider, ProviderState, RemoteConfig,
    RemoteProvider, RemoteStats,
};
#[cfg(feature = "file")]
pub use storage::FileStore;
pub use storage::{KeyValueStore, MemoryStore};
#[cfg(feature = "network")]
pub use transport::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
