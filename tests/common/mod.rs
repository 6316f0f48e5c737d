//! Shared test doubles

#![allow(dead_code)]

use parking_lot::Mutex;
use pettrack_logger::prelude::*;
use pettrack_logger::{HttpRequest, HttpResponse};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Provider that keeps every entry it receives
#[derive(Default)]
pub struct CollectingProvider {
    pub entries: Mutex<Vec<LogEntry>>,
}

impl CollectingProvider {
    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }
}

impl Provider for CollectingProvider {
    fn name(&self) -> &str {
        "collecting"
    }

    fn log(&self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

/// Provider whose every operation fails or panics
pub struct BrokenProvider {
    pub panics: bool,
}

impl Provider for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    fn log(&self, _entry: &LogEntry) -> Result<()> {
        if self.panics {
            panic!("broken provider");
        }
        Err(LoggerError::other("broken provider"))
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::ALL
    }

    fn flush(&self) -> Result<()> {
        if self.panics {
            panic!("broken flush");
        }
        Err(LoggerError::other("broken flush"))
    }

    fn cleanup(&self) -> Result<()> {
        Err(LoggerError::other("broken cleanup"))
    }
}

/// HTTP transport answering from a script, then with a fixed status
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    script: Mutex<VecDeque<u16>>,
    fallback: Mutex<u16>,
}

impl MockTransport {
    pub fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(status),
        })
    }

    pub fn respond_next(&self, status: u16) {
        self.script.lock().push_back(status);
    }

    pub fn set_status(&self, status: u16) {
        *self.fallback.lock() = status;
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Messages of each request body, one vector per request
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.requests
            .lock()
            .iter()
            .map(|r| {
                let entries: Vec<LogEntry> =
                    serde_json::from_slice(&r.body).expect("request body is a JSON array of entries");
                entries.into_iter().map(|e| e.message).collect()
            })
            .collect()
    }
}

impl HttpTransport for MockTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());
        let status = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| *self.fallback.lock());
        Ok(HttpResponse { status })
    }
}

/// Remote settings with timers long enough to never fire during a test
pub fn quiet_remote(batch_size: usize) -> RemoteConfig {
    RemoteConfig::new("test-token")
        .with_endpoint("https://logs.example.test/ingest")
        .with_batch_size(batch_size)
        .with_flush_interval(Duration::from_secs(3600))
        .with_retry_interval(Duration::from_secs(3600))
        .with_retry_backoff(Duration::from_millis(1))
}

/// Poll `condition` for up to two seconds
pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
