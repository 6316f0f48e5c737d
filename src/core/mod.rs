//! Core logger types and traits

pub mod child;
pub mod diagnostics;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod provider;

pub use child::ChildLogger;
pub use diagnostics::{diagnostics_enabled, set_diagnostics_enabled};
pub use error::{LoggerError, Result};
pub use log_context::LogContext;
pub use log_entry::{EntryMetadata, ErrorInfo, LogEntry};
pub use log_level::LogLevel;
pub use logger::{LogStats, Logger, LoggerBuilder, ProviderFailure};
pub use metrics::LoggerMetrics;
pub use provider::{Provider, ProviderCapabilities};
