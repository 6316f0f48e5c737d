//! Logger metrics for observability
//!
//! Counters for monitoring dispatcher health: how many entries were fanned
//! out, how many were filtered by level, and how many provider calls failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use pettrack_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_provider_failure();
///
/// assert_eq!(metrics.dispatched_count(), 1);
/// assert_eq!(metrics.provider_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries that passed the level filter and were fanned out
    dispatched: AtomicU64,

    /// Calls rejected by the minimum level
    filtered: AtomicU64,

    /// Provider calls that returned an error or panicked
    provider_failures: AtomicU64,

    /// Provider calls that panicked (subset of `provider_failures`)
    provider_panics: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            provider_failures: AtomicU64::new(0),
            provider_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn provider_failures(&self) -> u64 {
        self.provider_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn provider_panics(&self) -> u64 {
        self.provider_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_provider_failure(&self) -> u64 {
        self.provider_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_provider_panic(&self) -> u64 {
        self.provider_panics.fetch_add(1, Ordering::Relaxed);
        self.record_provider_failure()
    }

    /// Percentage of provider calls that failed, relative to dispatched entries
    pub fn failure_rate(&self) -> f64 {
        let dispatched = self.dispatched_count();
        if dispatched == 0 {
            return 0.0;
        }
        (self.provider_failures() as f64 / dispatched as f64) * 100.0
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.provider_failures.store(0, Ordering::Relaxed);
        self.provider_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.dispatched_count(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.provider_failures(), 0);
        assert_eq!(metrics.failure_rate(), 0.0);
    }

    #[test]
    fn test_panic_counts_as_failure() {
        let metrics = LoggerMetrics::new();
        metrics.record_provider_panic();
        assert_eq!(metrics.provider_panics(), 1);
        assert_eq!(metrics.provider_failures(), 1);
    }

    #[test]
    fn test_failure_rate_and_reset() {
        let metrics = LoggerMetrics::new();
        for _ in 0..10 {
            metrics.record_dispatched();
        }
        metrics.record_provider_failure();

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);

        metrics.reset();
        assert_eq!(metrics.dispatched_count(), 0);
        assert_eq!(metrics.provider_failures(), 0);
    }
}
