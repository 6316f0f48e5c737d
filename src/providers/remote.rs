//! Remote shipping provider
//!
//! Buffers entries in memory and ships them to an HTTP log intake in
//! batches. Undeliverable batches are parked in a durable
//! [`FailedQueue`] and retried later, so an offline device keeps its
//! telemetry (up to the queue cap) across restarts.
//!
//! All network I/O happens on a dedicated worker thread. `log` only
//! appends to the buffer and, when a batch is due, swaps the buffer out and
//! hands it to the worker, so callers never wait on the network.

use super::failed_queue::{FailedQueue, DEFAULT_MAX_FAILED_ENTRIES};
use crate::core::{
    diagnostics, LogEntry, LogLevel, LoggerError, Provider, ProviderCapabilities, Result,
};
use crate::storage::KeyValueStore;
use crate::transport::{HttpRequest, HttpTransport};
use crossbeam_channel::{bounded, select, tick, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://in.logs.betterstack.com";
pub const CLIENT_NAME_HEADER: &str = "X-Client-Name";
pub const CLIENT_NAME: &str = "pettrack-mobile";

const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_FLUSH_INTERVAL_MS: u64 = 5_000;
const DEFAULT_RETRY_INTERVAL_MS: u64 = 30_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Settings for [`RemoteProvider`]
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Bearer token for the log intake; required when enabled
    pub source_token: String,
    pub endpoint: String,
    /// Buffered entries that trigger an immediate flush
    pub batch_size: usize,
    pub flush_interval_ms: u64,
    /// Delivery attempts per chunk during a retry cycle
    pub max_retries: u32,
    /// Pause between two attempts on the same chunk
    pub retry_backoff_ms: u64,
    pub enabled: bool,
    pub retry_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub max_failed_entries: usize,
}

impl RemoteConfig {
    pub fn new(source_token: impl Into<String>) -> Self {
        Self {
            source_token: source_token.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval_ms = duration_to_ms(interval);
        self
    }

    #[must_use]
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval_ms = duration_to_ms(interval);
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = duration_to_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = duration_to_ms(backoff);
        self
    }

    #[must_use]
    pub fn with_max_failed_entries(mut self, max: usize) -> Self {
        self.max_failed_entries = max;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check the settings an active provider depends on
    pub fn validate(&self) -> Result<()> {
        if self.source_token.trim().is_empty() {
            return Err(LoggerError::config("RemoteProvider", "source token is missing"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(LoggerError::config("RemoteProvider", "endpoint is missing"));
        }
        if self.batch_size == 0 {
            return Err(LoggerError::config("RemoteProvider", "batch size must be at least 1"));
        }
        if self.flush_interval_ms == 0 || self.retry_interval_ms == 0 {
            return Err(LoggerError::config("RemoteProvider", "timer intervals must be non-zero"));
        }
        Ok(())
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            source_token: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            enabled: true,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_failed_entries: DEFAULT_MAX_FAILED_ENTRIES,
        }
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("source_token", &if self.source_token.is_empty() { "" } else { "<redacted>" })
            .field("endpoint", &self.endpoint)
            .field("batch_size", &self.batch_size)
            .field("flush_interval_ms", &self.flush_interval_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("enabled", &self.enabled)
            .field("retry_interval_ms", &self.retry_interval_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_failed_entries", &self.max_failed_entries)
            .finish()
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Lifecycle position of a [`RemoteProvider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Uninitialized,
    Active,
    Destroyed,
}

/// Delivery counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteStats {
    pub requests_sent: u64,
    pub entries_delivered: u64,
    pub failed_requests: u64,
}

enum Command {
    Ship(Vec<LogEntry>),
    Flush(Sender<()>),
    Retry(Sender<usize>),
    Shutdown,
}

enum Lifecycle {
    Uninitialized,
    Active {
        commands: Sender<Command>,
        worker: JoinHandle<()>,
    },
    Destroyed,
}

/// State shared between the provider handle and its worker thread
struct Shipper {
    config: RemoteConfig,
    transport: Arc<dyn HttpTransport>,
    failed: FailedQueue,
    buffer: Mutex<Vec<LogEntry>>,
    network_available: AtomicBool,
    requests_sent: AtomicU64,
    entries_delivered: AtomicU64,
    failed_requests: AtomicU64,
}

impl Shipper {
    fn take_buffer(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.buffer.lock())
    }

    fn flush_buffer(&self) {
        let batch = self.take_buffer();
        if !batch.is_empty() {
            self.ship(batch);
        }
    }

    /// Deliver one batch; on failure park it for the retry cycle.
    ///
    /// A success only marks the network available. Parked entries go out on
    /// the next retry tick, so a flush never waits on the retry cycle.
    fn ship(&self, batch: Vec<LogEntry>) {
        match self.send(&batch) {
            Ok(()) => self.network_available.store(true, Ordering::Relaxed),
            Err(e) => {
                self.network_available.store(false, Ordering::Relaxed);
                let message = format!(
                    "Remote delivery of {} entries failed, parking for retry: {}",
                    batch.len(),
                    e
                );
                if e.is_delivery_failure() {
                    diagnostics::warn(message);
                } else {
                    diagnostics::error(message);
                }
                self.park(&batch);
            }
        }
    }

    fn park(&self, entries: &[LogEntry]) {
        if let Err(e) = self.failed.append(entries) {
            diagnostics::error(format!(
                "Could not persist {} undelivered entries: {}",
                entries.len(),
                e
            ));
        }
    }

    /// Re-ship parked entries in `batch_size` chunks, oldest first.
    ///
    /// Works from a snapshot and removes each chunk from the durable queue
    /// only once it has been accepted, so an interrupted cycle leaves the
    /// undelivered entries stored. Stops at the first chunk that still fails
    /// after `max_retries` attempts. Returns the number of entries delivered.
    fn retry_failed(&self) -> usize {
        let parked = self.failed.load();
        if parked.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        for chunk in parked.chunks(self.config.batch_size) {
            if let Err(e) = self.send_with_retries(chunk) {
                self.network_available.store(false, Ordering::Relaxed);
                diagnostics::warn(format!(
                    "Retry of parked entries failed, {} remain queued: {}",
                    parked.len() - delivered,
                    e
                ));
                return delivered;
            }
            if let Err(e) = self.failed.remove_delivered(chunk) {
                diagnostics::error(format!(
                    "Could not remove {} delivered entries from the failed queue: {}",
                    chunk.len(),
                    e
                ));
            }
            delivered += chunk.len();
        }

        self.network_available.store(true, Ordering::Relaxed);
        delivered
    }

    /// Up to `max(1, max_retries)` attempts with `retry_backoff` between them
    fn send_with_retries(&self, chunk: &[LogEntry]) -> Result<()> {
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;
        loop {
            match self.send(chunk) {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= attempts => return Err(e),
                Err(_) => {
                    attempt += 1;
                    thread::sleep(self.config.retry_backoff());
                }
            }
        }
    }

    fn send(&self, batch: &[LogEntry]) -> Result<()> {
        let body = serde_json::to_vec(batch)?;
        let request = HttpRequest {
            url: self.config.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.source_token),
                ),
                (CLIENT_NAME_HEADER.to_string(), CLIENT_NAME.to_string()),
            ],
            body,
            timeout: self.config.request_timeout(),
        };

        self.requests_sent.fetch_add(1, Ordering::Relaxed);
        let outcome = catch_unwind(AssertUnwindSafe(|| self.transport.post(&request)))
            .unwrap_or_else(|payload| {
                Err(LoggerError::transport(format!(
                    "transport panicked: {}",
                    diagnostics::panic_message(payload.as_ref())
                )))
            })
            .and_then(|response| {
                if response.is_success() {
                    Ok(())
                } else {
                    Err(LoggerError::HttpStatus {
                        status: response.status,
                    })
                }
            });

        match outcome {
            Ok(()) => {
                self.entries_delivered
                    .fetch_add(batch.len() as u64, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.failed_requests.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

/// Run one worker step, keeping the worker alive if it panics
fn guarded(step: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(step)) {
        diagnostics::error(format!(
            "Remote shipping worker recovered from panic: {}",
            diagnostics::panic_message(payload.as_ref())
        ));
    }
}

fn run_worker(shipper: Arc<Shipper>, commands: Receiver<Command>) {
    let flush_ticker = tick(shipper.config.flush_interval());
    let retry_ticker = tick(shipper.config.retry_interval());

    loop {
        select! {
            recv(commands) -> command => match command {
                Ok(Command::Ship(batch)) => guarded(|| shipper.ship(batch)),
                Ok(Command::Flush(reply)) => {
                    guarded(|| shipper.flush_buffer());
                    let _ = reply.send(());
                }
                Ok(Command::Retry(reply)) => {
                    let mut delivered = 0;
                    guarded(|| delivered = shipper.retry_failed());
                    let _ = reply.send(delivered);
                }
                Ok(Command::Shutdown) | Err(_) => {
                    guarded(|| shipper.flush_buffer());
                    break;
                }
            },
            recv(flush_ticker) -> _ => guarded(|| shipper.flush_buffer()),
            recv(retry_ticker) -> _ => {
                if shipper.network_available.load(Ordering::Relaxed) {
                    guarded(|| {
                        shipper.retry_failed();
                    });
                }
            },
        }
    }
}

/// Batching HTTP provider with a durable failed-delivery queue
///
/// # Example
///
/// ```no_run
/// use pettrack_logger::prelude::*;
/// use pettrack_logger::providers::{RemoteConfig, RemoteProvider};
/// use pettrack_logger::storage::MemoryStore;
/// use pettrack_logger::transport::ReqwestTransport;
/// use std::sync::Arc;
///
/// # fn main() -> Result<()> {
/// let remote = RemoteProvider::new(
///     RemoteConfig::new("source-token"),
///     Arc::new(ReqwestTransport::new()?),
///     Arc::new(MemoryStore::new()),
/// );
/// remote.initialize()?;
///
/// let logger = Logger::new();
/// logger.add_provider(Arc::new(remote));
/// logger.info("Pet profile synced");
/// # Ok(())
/// # }
/// ```
pub struct RemoteProvider {
    shipper: Arc<Shipper>,
    lifecycle: Mutex<Lifecycle>,
}

impl RemoteProvider {
    pub fn new(
        config: RemoteConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let failed = FailedQueue::with_capacity(store, config.max_failed_entries);
        Self {
            shipper: Arc::new(Shipper {
                config,
                transport,
                failed,
                buffer: Mutex::new(Vec::new()),
                network_available: AtomicBool::new(true),
                requests_sent: AtomicU64::new(0),
                entries_delivered: AtomicU64::new(0),
                failed_requests: AtomicU64::new(0),
            }),
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.shipper.config
    }

    pub fn state(&self) -> ProviderState {
        match *self.lifecycle.lock() {
            Lifecycle::Uninitialized => ProviderState::Uninitialized,
            Lifecycle::Active { .. } => ProviderState::Active,
            Lifecycle::Destroyed => ProviderState::Destroyed,
        }
    }

    /// Entries waiting in memory for the next flush
    pub fn buffered_len(&self) -> usize {
        self.shipper.buffer.lock().len()
    }

    /// Entries parked in the durable failed-delivery queue
    pub fn failed_len(&self) -> usize {
        self.shipper.failed.len()
    }

    pub fn is_network_available(&self) -> bool {
        self.shipper.network_available.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> RemoteStats {
        RemoteStats {
            requests_sent: self.shipper.requests_sent.load(Ordering::Relaxed),
            entries_delivered: self.shipper.entries_delivered.load(Ordering::Relaxed),
            failed_requests: self.shipper.failed_requests.load(Ordering::Relaxed),
        }
    }

    /// Re-ship the durable queue now, regardless of the availability flag.
    ///
    /// Waits for the worker and returns the number of entries delivered.
    /// Returns 0 when the provider is not active.
    pub fn retry_failed(&self) -> usize {
        let Some(commands) = self.active_sender() else {
            return 0;
        };
        let (reply_tx, reply_rx) = bounded(1);
        if commands.send(Command::Retry(reply_tx)).is_err() {
            return 0;
        }
        reply_rx.recv().unwrap_or(0)
    }

    fn active_sender(&self) -> Option<Sender<Command>> {
        match &*self.lifecycle.lock() {
            Lifecycle::Active { commands, .. } => Some(commands.clone()),
            _ => None,
        }
    }

    fn enqueue(&self, entries: &[LogEntry]) {
        let lifecycle = self.lifecycle.lock();
        let Lifecycle::Active { commands, .. } = &*lifecycle else {
            return;
        };

        let due = {
            let mut buffer = self.shipper.buffer.lock();
            buffer.extend_from_slice(entries);
            let urgent = entries.iter().any(|e| e.level == LogLevel::Error);
            if urgent || buffer.len() >= self.shipper.config.batch_size {
                Some(std::mem::take(&mut *buffer))
            } else {
                None
            }
        };

        if let Some(batch) = due {
            if let Err(err) = commands.send(Command::Ship(batch)) {
                // Worker is gone; keep the batch for the next run
                if let Command::Ship(batch) = err.into_inner() {
                    self.shipper.park(&batch);
                }
            }
        }
    }
}

impl Provider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::ALL
    }

    /// Start the flush and retry timers.
    ///
    /// A disabled provider stays inert and returns `Ok`. An enabled
    /// provider with an invalid configuration (e.g. no token) stays inert
    /// and returns the configuration error.
    fn initialize(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        match *lifecycle {
            Lifecycle::Active { .. } => return Ok(()),
            Lifecycle::Destroyed => {
                diagnostics::warn("Remote provider cannot be re-initialized after cleanup");
                return Ok(());
            }
            Lifecycle::Uninitialized => {}
        }

        if !self.shipper.config.enabled {
            diagnostics::warn("Remote provider disabled, entries will not be shipped");
            return Ok(());
        }
        self.shipper.config.validate()?;

        let (commands, receiver) = unbounded();
        let shipper = Arc::clone(&self.shipper);
        let worker = thread::Builder::new()
            .name("pettrack-log-shipper".to_string())
            .spawn(move || run_worker(shipper, receiver))?;

        *lifecycle = Lifecycle::Active { commands, worker };
        Ok(())
    }

    fn log(&self, entry: &LogEntry) -> Result<()> {
        self.enqueue(std::slice::from_ref(entry));
        Ok(())
    }

    fn log_batch(&self, entries: &[LogEntry]) -> Result<()> {
        self.enqueue(entries);
        Ok(())
    }

    /// Ship the current buffer and wait until it is delivered or parked.
    ///
    /// Batches handed to the worker earlier are shipped first.
    fn flush(&self) -> Result<()> {
        let Some(commands) = self.active_sender() else {
            return Ok(());
        };
        let (reply_tx, reply_rx) = bounded(1);
        if commands.send(Command::Flush(reply_tx)).is_ok() {
            let _ = reply_rx.recv();
        }
        Ok(())
    }

    /// Stop both timers, ship the final buffer and stop accepting entries
    fn cleanup(&self) -> Result<()> {
        let previous = std::mem::replace(&mut *self.lifecycle.lock(), Lifecycle::Destroyed);
        if let Lifecycle::Active { commands, worker } = previous {
            let _ = commands.send(Command::Shutdown);
            drop(commands);
            if worker.join().is_err() {
                diagnostics::error("Remote shipping worker panicked during shutdown");
            }
            // Anything the worker could not take with it is parked, not lost
            let leftover = self.shipper.take_buffer();
            if !leftover.is_empty() {
                self.shipper.park(&leftover);
            }
        }
        Ok(())
    }
}

impl Drop for RemoteProvider {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, FAILED_LOGS_KEY};
    use crate::transport::HttpResponse;
    use std::collections::VecDeque;

    /// Records requests and answers from a script, then with `fallback`
    struct ScriptedTransport {
        requests: Mutex<Vec<HttpRequest>>,
        script: Mutex<VecDeque<Result<HttpResponse>>>,
        fallback: u16,
    }

    impl ScriptedTransport {
        fn with_status(status: u16) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                script: Mutex::new(VecDeque::new()),
                fallback: status,
            })
        }

        fn push(&self, outcome: Result<HttpResponse>) {
            self.script.lock().push_back(outcome);
        }

        fn batches(&self) -> Vec<Vec<String>> {
            self.requests
                .lock()
                .iter()
                .map(|r| {
                    let entries: Vec<LogEntry> = serde_json::from_slice(&r.body).unwrap();
                    entries.into_iter().map(|e| e.message).collect()
                })
                .collect()
        }
    }

    impl HttpTransport for ScriptedTransport {
        fn post(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().push(request.clone());
            self.script.lock().pop_front().unwrap_or(Ok(HttpResponse {
                status: self.fallback,
            }))
        }
    }

    fn quiet_config(batch_size: usize) -> RemoteConfig {
        RemoteConfig::new("token-123")
            .with_endpoint("https://logs.example.com/ingest")
            .with_batch_size(batch_size)
            .with_flush_interval(Duration::from_secs(3600))
            .with_retry_interval(Duration::from_secs(3600))
            .with_retry_backoff(Duration::from_millis(1))
    }

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry::new(level, message)
    }

    #[test]
    fn test_log_before_initialize_is_noop() {
        let transport = ScriptedTransport::with_status(200);
        let provider = RemoteProvider::new(quiet_config(1), transport.clone(), Arc::new(MemoryStore::new()));

        provider.log(&entry(LogLevel::Error, "early")).unwrap();
        provider.flush().unwrap();

        assert_eq!(provider.state(), ProviderState::Uninitialized);
        assert_eq!(provider.buffered_len(), 0);
        assert!(transport.batches().is_empty());
    }

    #[test]
    fn test_initialize_requires_token() {
        let provider = RemoteProvider::new(
            RemoteConfig::new("  "),
            ScriptedTransport::with_status(200),
            Arc::new(MemoryStore::new()),
        );
        let err = provider.initialize().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert_eq!(provider.state(), ProviderState::Uninitialized);
    }

    #[test]
    fn test_disabled_provider_stays_inert() {
        let transport = ScriptedTransport::with_status(200);
        let provider = RemoteProvider::new(
            quiet_config(1).with_enabled(false),
            transport.clone(),
            Arc::new(MemoryStore::new()),
        );
        provider.initialize().unwrap();
        provider.log(&entry(LogLevel::Error, "ignored")).unwrap();
        provider.cleanup().unwrap();

        assert!(transport.batches().is_empty());
    }

    #[test]
    fn test_request_shape() {
        let transport = ScriptedTransport::with_status(202);
        let provider = RemoteProvider::new(quiet_config(10), transport.clone(), Arc::new(MemoryStore::new()));
        provider.initialize().unwrap();

        provider.log(&entry(LogLevel::Info, "walk logged")).unwrap();
        provider.flush().unwrap();

        let requests = transport.requests.lock().clone();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, "https://logs.example.com/ingest");
        assert_eq!(request.header("authorization"), Some("Bearer token-123"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header(CLIENT_NAME_HEADER), Some(CLIENT_NAME));
        assert_eq!(request.timeout, Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
    }

    #[test]
    fn test_flush_of_empty_buffer_sends_nothing() {
        let transport = ScriptedTransport::with_status(200);
        let provider = RemoteProvider::new(quiet_config(10), transport.clone(), Arc::new(MemoryStore::new()));
        provider.initialize().unwrap();

        provider.flush().unwrap();
        provider.flush().unwrap();
        provider.cleanup().unwrap();

        assert_eq!(provider.stats().requests_sent, 0);
    }

    #[test]
    fn test_error_entry_ships_immediately() {
        let transport = ScriptedTransport::with_status(200);
        let provider = RemoteProvider::new(quiet_config(10), transport.clone(), Arc::new(MemoryStore::new()));
        provider.initialize().unwrap();

        provider.log(&entry(LogLevel::Info, "before")).unwrap();
        provider.log(&entry(LogLevel::Error, "crash")).unwrap();
        assert_eq!(provider.buffered_len(), 0);

        // Flush is queued behind the ship, so the batch is out once it returns
        provider.flush().unwrap();
        assert_eq!(transport.batches(), vec![vec!["before", "crash"]]);
        assert_eq!(provider.stats().requests_sent, 1);
    }

    #[test]
    fn test_server_error_parks_batch() {
        let transport = ScriptedTransport::with_status(500);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let provider = RemoteProvider::new(quiet_config(10), transport.clone(), Arc::clone(&store));
        provider.initialize().unwrap();

        provider.log(&entry(LogLevel::Info, "a")).unwrap();
        provider.log(&entry(LogLevel::Warn, "b")).unwrap();
        provider.flush().unwrap();

        assert_eq!(provider.buffered_len(), 0);
        assert!(!provider.is_network_available());
        let parked = FailedQueue::new(store).load();
        let messages: Vec<_> = parked.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }

    #[test]
    fn test_timeout_is_parked_like_a_failure() {
        let transport = ScriptedTransport::with_status(200);
        transport.push(Err(LoggerError::timeout(Duration::from_secs(10))));
        let provider = RemoteProvider::new(quiet_config(1), transport.clone(), Arc::new(MemoryStore::new()));
        provider.initialize().unwrap();

        provider.log(&entry(LogLevel::Info, "slow network")).unwrap();
        provider.flush().unwrap();

        assert_eq!(provider.failed_len(), 1);
        assert_eq!(provider.stats().failed_requests, 1);
    }

    #[test]
    fn test_retry_redelivers_in_chunks() {
        let transport = ScriptedTransport::with_status(200);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let parked: Vec<LogEntry> = (0..5)
            .map(|i| entry(LogLevel::Info, &format!("p{}", i)))
            .collect();
        store
            .set(FAILED_LOGS_KEY, &serde_json::to_string(&parked).unwrap())
            .unwrap();

        let provider = RemoteProvider::new(quiet_config(2), transport.clone(), store);
        provider.initialize().unwrap();

        assert_eq!(provider.retry_failed(), 5);
        assert_eq!(
            transport.batches(),
            vec![vec!["p0", "p1"], vec!["p2", "p3"], vec!["p4"]]
        );
        assert_eq!(provider.failed_len(), 0);
    }

    #[test]
    fn test_retry_stops_at_first_failing_chunk() {
        let transport = ScriptedTransport::with_status(200);
        // first chunk ok, second chunk fails on every attempt
        transport.push(Ok(HttpResponse { status: 200 }));
        for _ in 0..3 {
            transport.push(Ok(HttpResponse { status: 503 }));
        }
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let queue = FailedQueue::new(Arc::clone(&store));
        let parked: Vec<LogEntry> = (0..6)
            .map(|i| entry(LogLevel::Info, &format!("p{}", i)))
            .collect();
        queue.append(&parked).unwrap();

        let provider = RemoteProvider::new(quiet_config(2), transport.clone(), store);
        provider.initialize().unwrap();

        assert_eq!(provider.retry_failed(), 2);
        let remaining: Vec<_> = queue.load().into_iter().map(|e| e.message).collect();
        assert_eq!(remaining, vec!["p2", "p3", "p4", "p5"]);
        assert!(!provider.is_network_available());
        // one good request plus max_retries attempts on the failing chunk
        assert_eq!(provider.stats().requests_sent, 4);
    }

    #[test]
    fn test_retry_pauses_between_attempts() {
        struct StampingTransport {
            sent_at: Mutex<Vec<std::time::Instant>>,
        }

        impl HttpTransport for StampingTransport {
            fn post(&self, _request: &HttpRequest) -> Result<HttpResponse> {
                self.sent_at.lock().push(std::time::Instant::now());
                Ok(HttpResponse { status: 503 })
            }
        }

        let transport = Arc::new(StampingTransport {
            sent_at: Mutex::new(Vec::new()),
        });
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        FailedQueue::new(Arc::clone(&store))
            .append(&[entry(LogLevel::Info, "parked")])
            .unwrap();

        let backoff = Duration::from_millis(40);
        let provider = RemoteProvider::new(
            quiet_config(10).with_retry_backoff(backoff),
            transport.clone(),
            store,
        );
        provider.initialize().unwrap();

        assert_eq!(provider.retry_failed(), 0);
        let sent_at = transport.sent_at.lock().clone();
        assert_eq!(sent_at.len(), 3);
        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= backoff);
        }
        assert_eq!(provider.failed_len(), 1);
    }

    #[test]
    fn test_success_marks_network_available_without_retrying() {
        let transport = ScriptedTransport::with_status(200);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let queue = FailedQueue::new(Arc::clone(&store));
        queue.append(&[entry(LogLevel::Info, "offline")]).unwrap();

        let provider = RemoteProvider::new(quiet_config(1), transport.clone(), store);
        provider.initialize().unwrap();

        provider.log(&entry(LogLevel::Info, "online")).unwrap();
        provider.flush().unwrap();

        assert_eq!(transport.batches(), vec![vec!["online"]]);
        assert!(provider.is_network_available());
        assert_eq!(queue.len(), 1);

        assert_eq!(provider.retry_failed(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cleanup_ships_final_buffer_then_rejects() {
        let transport = ScriptedTransport::with_status(200);
        let provider = RemoteProvider::new(quiet_config(10), transport.clone(), Arc::new(MemoryStore::new()));
        provider.initialize().unwrap();

        provider.log(&entry(LogLevel::Info, "last words")).unwrap();
        provider.cleanup().unwrap();
        assert_eq!(provider.state(), ProviderState::Destroyed);
        assert_eq!(transport.batches(), vec![vec!["last words"]]);

        provider.log(&entry(LogLevel::Error, "after cleanup")).unwrap();
        provider.flush().unwrap();
        provider.initialize().unwrap();
        assert_eq!(provider.state(), ProviderState::Destroyed);
        assert_eq!(transport.batches().len(), 1);
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let rendered = format!("{:?}", RemoteConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_config_defaults() {
        let config = RemoteConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.flush_interval(), Duration::from_millis(5000));
        assert_eq!(config.retry_interval(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff(), Duration::from_millis(500));
        assert!(config.enabled);
        assert_eq!(config.max_failed_entries, 500);
    }
}
