//! Retry execution

use std::error::Error;
use std::future::Future;
use std::time::Instant;

use crate::types::RetryPolicy;

use super::error::RetryError;
use super::observer::{RetryObserver, TracingObserver};

/// Builder for a [`RetryExecutor`]
pub struct RetryExecutorBuilder<O = TracingObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl Default for RetryExecutorBuilder<TracingObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<TracingObserver> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: TracingObserver::default(),
        }
    }
}

impl<O> RetryExecutorBuilder<O> {
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer,
        }
    }

    pub fn build(self) -> RetryExecutor<O> {
        RetryExecutor {
            policy: self.policy,
            observer: self.observer,
        }
    }
}

/// Runs an operation until it succeeds or the policy's attempts run out
pub struct RetryExecutor<O> {
    policy: RetryPolicy,
    observer: O,
}

impl<O: RetryObserver> RetryExecutor<O> {
    /// Policy this executor runs under
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `op`, pausing for the policy's delay between attempts
    ///
    /// `op` produces a fresh future for each attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        let start = Instant::now();
        let max_attempts = self.policy.attempts();
        let delay = self.policy.delay();
        let mut attempt = 1;

        loop {
            self.observer.on_attempt_start(attempt, max_attempts);

            let err = match op().await {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Err(err) => err,
            };

            if attempt >= max_attempts {
                self.observer.on_exhausted(attempt, &err);
                return Err(RetryError::new(attempt, err, start.elapsed()));
            }

            self.observer.on_attempt_failed(attempt, &err, delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
