//! Error type returned by the retry engine

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Every allowed attempt failed
///
/// Generic over `E`, the error type of the operation being retried.
#[derive(Debug)]
pub struct RetryError<E> {
    attempts: u32,
    source: E,
    total_duration: Duration,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts over {:.2}s: {}",
            self.attempts,
            self.total_duration.as_secs_f64(),
            self.source
        )
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl<E> RetryError<E> {
    pub fn new(attempts: u32, source: E, total_duration: Duration) -> Self {
        Self {
            attempts,
            source,
            total_duration,
        }
    }

    /// Number of attempts made
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Time spent across all attempts, including pauses
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// The error from the last attempt
    pub fn last_error(&self) -> &E {
        &self.source
    }

    /// The error from the last attempt, consuming this error
    pub fn into_source(self) -> E {
        self.source
    }
}
