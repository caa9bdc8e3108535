//! Retry attempt observation

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Receives callbacks while an operation is being retried
pub trait RetryObserver: Send + Sync {
    /// An attempt (1-indexed) is about to start
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// An attempt failed and the next one starts after `delay`
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration);

    /// The operation succeeded on `attempt`
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// The final attempt failed
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error);
}

/// Observer that logs each event through `tracing`
///
/// Failed attempts log at WARN, exhaustion at ERROR, a success after a
/// retry at INFO, and everything else at DEBUG.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt,
            max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, will retry"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(operation = %self.operation, "succeeded on first attempt");
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        tracing::error!(
            operation = %self.operation,
            attempts,
            error = %final_error,
            "all attempts failed"
        );
    }
}

/// Observer that counts events and records the delays it was told about
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    failures: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    delays: Mutex<Vec<Duration>>,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Failed attempts that were followed by a retry
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    /// Delays announced before each retry, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Error, delay: Duration) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(delay);
        }
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        (**self).on_exhausted(attempts, final_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[test]
    fn test_stats_observer_counts() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 3);
        observer.on_attempt_failed(1, &error, Duration::from_millis(2000));
        observer.on_attempt_start(2, 3);
        observer.on_success(2, Duration::from_millis(2100));

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.successes(), 1);
        assert_eq!(observer.exhaustions(), 0);
        assert_eq!(observer.delays(), vec![Duration::from_millis(2000)]);
    }

    #[test]
    fn test_arc_dyn_observer_forwards() {
        let stats = Arc::new(StatsObserver::new());
        let observer: Arc<dyn RetryObserver> = stats.clone();
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 3);
        observer.on_exhausted(1, &error);

        assert_eq!(stats.attempt_starts(), 1);
        assert_eq!(stats.exhaustions(), 1);
    }

    #[test]
    fn test_tracing_observer_name() {
        assert_eq!(TracingObserver::new("create-project").operation(), "create-project");
        assert_eq!(TracingObserver::default().operation(), "retry");
    }
}
