//! Main logger implementation
//!
//! The `Logger` is the single dispatcher of a process: it owns the
//! provider registry and the minimum level, stamps each entry with the
//! process metadata and fans it out. A provider that fails or panics is
//! isolated; logging never surfaces an error to the caller.

use super::{
    child::ChildLogger,
    diagnostics,
    error::{LoggerError, Result},
    log_context::LogContext,
    log_entry::{EntryMetadata, ErrorInfo, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    provider::Provider,
};
use crate::config::LoggerConfig;
use crate::providers::{ConsoleProvider, LocalBufferProvider, RemoteProvider};
use crate::storage::{self, KeyValueStore, FAILED_LOGS_KEY, LOCAL_LOGS_KEY};
use crate::transport::HttpTransport;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A provider call that failed during `flush_logs` or `cleanup`
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: LoggerError,
}

/// Summary of the locally stored logs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub total_logs: usize,
    pub failed_logs: usize,
    pub oldest_timestamp: Option<DateTime<Utc>>,
    pub newest_timestamp: Option<DateTime<Utc>>,
}

/// Cheap to clone; clones share providers, level, metadata and metrics.
#[derive(Clone)]
pub struct Logger {
    min_level: Arc<RwLock<LogLevel>>,
    providers: Arc<RwLock<Vec<Arc<dyn Provider>>>>,
    metadata: Arc<EntryMetadata>,
    metrics: Arc<LoggerMetrics>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: Arc::new(RwLock::new(LogLevel::Info)),
            providers: Arc::new(RwLock::new(Vec::new())),
            metadata: Arc::new(EntryMetadata::default()),
            metrics: Arc::new(LoggerMetrics::new()),
            store: None,
        }
    }

    /// Compose the standard provider set for the app.
    ///
    /// Console output follows the environment, the local buffer writes to
    /// `store`, and a remote provider is added when `config.remote` is set.
    ///
    /// # Errors
    ///
    /// Returns the remote provider's configuration error (e.g. an enabled
    /// remote section without a token).
    pub fn from_config(
        config: &LoggerConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let mut builder = Logger::builder()
            .min_level(config.effective_min_level())
            .metadata(config.metadata())
            .store(Arc::clone(&store))
            .provider(ConsoleProvider::for_environment(config.environment).with_app_tag(&config.app_name))
            .provider(LocalBufferProvider::with_capacity(
                Arc::clone(&store),
                config.local_buffer_size,
            ));

        if let Some(ref remote_config) = config.remote {
            let remote = RemoteProvider::new(remote_config.clone(), transport, store);
            remote.initialize()?;
            builder = builder.provider(remote);
        }

        Ok(builder.build())
    }

    pub fn add_provider(&self, provider: Arc<dyn Provider>) {
        self.providers.write().push(provider);
    }

    /// Remove a provider by identity. Returns whether it was registered.
    pub fn remove_provider(&self, provider: &Arc<dyn Provider>) -> bool {
        let mut providers = self.providers.write();
        let before = providers.len();
        providers.retain(|p| !Arc::ptr_eq(p, provider));
        providers.len() != before
    }

    /// Remove every provider with the given name. Returns whether any matched.
    pub fn remove_provider_named(&self, name: &str) -> bool {
        let mut providers = self.providers.write();
        let before = providers.len();
        providers.retain(|p| p.name() != name);
        providers.len() != before
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    /// Dispatcher counters
    ///
    /// # Example
    ///
    /// ```
    /// use pettrack_logger::Logger;
    ///
    /// let logger = Logger::new();
    /// logger.debug("filtered at the default Info level");
    /// assert_eq!(logger.metrics().filtered_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Derive a logger that adds `bindings` to every entry
    pub fn child(&self, bindings: LogContext) -> ChildLogger {
        ChildLogger::new(self.clone(), bindings)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(level, message.into(), None, None);
    }

    /// Log with structured context fields
    pub fn log_with_context(&self, level: LogLevel, message: impl Into<String>, context: LogContext) {
        self.emit(level, message.into(), Some(context), None);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn debug_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Debug, message, context);
    }

    pub fn info_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Info, message, context);
    }

    pub fn warn_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Warn, message, context);
    }

    pub fn error_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Error, message, context);
    }

    /// Error-level entry carrying a captured error
    pub fn error_with_error<E>(&self, message: impl Into<String>, error: &E, context: Option<LogContext>)
    where
        E: std::error::Error + ?Sized,
    {
        self.emit(
            LogLevel::Error,
            message.into(),
            context,
            Some(ErrorInfo::from_error(error)),
        );
    }

    fn emit(
        &self,
        level: LogLevel,
        message: String,
        context: Option<LogContext>,
        error: Option<ErrorInfo>,
    ) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let mut entry = LogEntry::new(level, message).with_metadata((*self.metadata).clone());
        if let Some(context) = context {
            entry = entry.with_context(context);
        }
        if let Some(error) = error {
            entry = entry.with_error(error);
        }
        self.dispatch(&entry);
    }

    /// Fan an entry out to every provider with per-provider isolation
    fn dispatch(&self, entry: &LogEntry) {
        self.metrics.record_dispatched();

        // Snapshot so providers run without the registry lock held
        let providers: Vec<Arc<dyn Provider>> = self.providers.read().clone();
        for provider in &providers {
            if let Err(e) = self.call_isolated(provider, |p| p.log(entry)) {
                diagnostics::error(format!("Provider '{}' failed: {}", provider.name(), e));
            }
        }
    }

    /// Run `call` against one provider, converting panics into errors
    fn call_isolated<F>(&self, provider: &Arc<dyn Provider>, call: F) -> Result<()>
    where
        F: FnOnce(&dyn Provider) -> Result<()>,
    {
        match catch_unwind(AssertUnwindSafe(|| call(provider.as_ref()))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.metrics.record_provider_failure();
                Err(e)
            }
            Err(panic_info) => {
                self.metrics.record_provider_panic();
                Err(LoggerError::provider_panicked(
                    provider.name(),
                    diagnostics::panic_message(panic_info.as_ref()),
                ))
            }
        }
    }

    /// Flush every provider that supports it.
    ///
    /// Every provider is attempted even if an earlier one fails; the
    /// failures are returned instead of raised.
    pub fn flush_logs(&self) -> Vec<ProviderFailure> {
        self.fan_out(|p| p.capabilities().flush, |p| p.flush())
    }

    /// Release every provider that supports cleanup, with the same
    /// isolation as [`flush_logs`](Self::flush_logs).
    pub fn cleanup(&self) -> Vec<ProviderFailure> {
        self.fan_out(|p| p.capabilities().cleanup, |p| p.cleanup())
    }

    fn fan_out<S, C>(&self, supports: S, call: C) -> Vec<ProviderFailure>
    where
        S: Fn(&dyn Provider) -> bool,
        C: Fn(&dyn Provider) -> Result<()>,
    {
        let providers: Vec<Arc<dyn Provider>> = self.providers.read().clone();
        let mut failures = Vec::new();
        for provider in providers.iter().filter(|p| supports(p.as_ref())) {
            if let Err(error) = self.call_isolated(provider, &call) {
                diagnostics::warn(format!("Provider '{}' failed: {}", provider.name(), error));
                failures.push(ProviderFailure {
                    provider: provider.name().to_string(),
                    error,
                });
            }
        }
        failures
    }

    /// Entries kept in the local buffer, oldest first
    pub fn get_logs(&self) -> Vec<LogEntry> {
        match self.store {
            Some(ref store) => storage::read_entries(store.as_ref(), LOCAL_LOGS_KEY),
            None => Vec::new(),
        }
    }

    /// Empty the local buffer. The failed-delivery queue is left untouched.
    pub fn clear_logs(&self) {
        if let Some(ref store) = self.store {
            if let Err(e) = store.remove(LOCAL_LOGS_KEY) {
                diagnostics::warn(format!("Failed to clear local logs: {}", e));
            }
        }
    }

    pub fn get_log_stats(&self) -> LogStats {
        let Some(ref store) = self.store else {
            return LogStats::default();
        };
        let logs = storage::read_entries(store.as_ref(), LOCAL_LOGS_KEY);
        let failed = storage::read_entries(store.as_ref(), FAILED_LOGS_KEY);

        LogStats {
            total_logs: logs.len(),
            failed_logs: failed.len(),
            oldest_timestamp: logs.iter().map(|e| e.timestamp).min(),
            newest_timestamp: logs.iter().map(|e| e.timestamp).max(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use pettrack_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .provider(ConsoleProvider::new())
///     .build();
/// assert_eq!(logger.provider_names(), vec!["console"]);
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    providers: Vec<Arc<dyn Provider>>,
    metadata: Option<EntryMetadata>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            providers: Vec::new(),
            metadata: None,
            store: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add a provider
    #[must_use = "builder methods return a new value"]
    pub fn provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Add a provider the caller keeps a handle to
    #[must_use = "builder methods return a new value"]
    pub fn shared_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn metadata(mut self, metadata: EntryMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Store backing `get_logs`, `clear_logs` and `get_log_stats`
    #[must_use = "builder methods return a new value"]
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            min_level: Arc::new(RwLock::new(self.min_level)),
            providers: Arc::new(RwLock::new(self.providers)),
            metadata: Arc::new(self.metadata.unwrap_or_default()),
            metrics: Arc::new(LoggerMetrics::new()),
            store: self.store,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
