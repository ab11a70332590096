//! Hooks for watching a retrier at work

use std::error::Error;
use std::time::Duration;

/// Notified as a [`Retrier`](super::Retrier) runs. All hooks default to no-ops.
pub trait RetryObserver: Send + Sync {
    /// Attempt `attempt` failed transiently; the next one starts after `delay`
    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        let _ = (attempt, error, delay);
    }

    /// Attempt `attempt` succeeded after `elapsed`
    fn on_success(&self, attempt: u32, elapsed: Duration) {
        let _ = (attempt, elapsed);
    }

    /// The retrier stopped after `attempts` attempts without success
    fn on_give_up(&self, attempts: u32, error: &dyn Error) {
        let _ = (attempts, error);
    }
}

/// Silent observer
impl RetryObserver for () {}

/// Reports retries through `tracing`, tagged with an operation name
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

impl RetryObserver for TracingObserver {
    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "{} failed ({}), retrying",
            self.operation,
            error
        );
    }

    fn on_success(&self, attempt: u32, elapsed: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "{} succeeded after retrying",
                self.operation
            );
        }
    }

    fn on_give_up(&self, attempts: u32, error: &dyn Error) {
        tracing::error!(
            operation = %self.operation,
            attempts,
            "{} failed: {}",
            self.operation,
            error
        );
    }
}
