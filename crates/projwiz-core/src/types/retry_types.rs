//! Retry policy types

use std::time::Duration;

/// Attempt budget and pause for a retried operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, 1000)
    }
}

impl RetryPolicy {
    /// A policy with a constant pause between attempts
    pub fn fixed(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }

    /// Pause before the next attempt
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Attempts actually made; a zero budget still makes one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_policy() {
        let policy = RetryPolicy::fixed(3, 2000);
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_budget_still_attempts_once() {
        assert_eq!(RetryPolicy::fixed(0, 0).attempts(), 1);
    }
}
