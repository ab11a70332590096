//! The retry loop

use super::backoff::backoff_delay;
use super::classify::RetryPredicate;
use super::error::RetryError;
use super::observer::RetryObserver;
use crate::types::RetryPolicy;
use std::error::Error;
use std::future::Future;
use tokio::time::{sleep, Instant};

/// Runs an operation until it succeeds, fails permanently, or the policy's
/// attempts run out
pub struct Retrier<P, O = ()> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    jitter: bool,
}

impl<P> Retrier<P> {
    pub fn new(policy: RetryPolicy, predicate: P) -> Self {
        Self {
            policy,
            predicate,
            observer: (),
            jitter: true,
        }
    }
}

impl<P, O> Retrier<P, O> {
    pub fn with_observer<O2: RetryObserver>(self, observer: O2) -> Retrier<P, O2> {
        Retrier {
            policy: self.policy,
            predicate: self.predicate,
            observer,
            jitter: self.jitter,
        }
    }

    /// Use exact policy delays
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn run<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + Send + 'static,
        P: RetryPredicate<E>,
        O: RetryObserver,
    {
        let started = Instant::now();
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            let error = match op().await {
                Ok(value) => {
                    self.observer.on_success(attempt, started.elapsed());
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !self.predicate.should_retry(&error) {
                self.observer.on_give_up(attempt, &error);
                return Err(RetryError::Permanent { attempt, error });
            }

            if attempt == max_attempts {
                self.observer.on_give_up(attempt, &error);
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                    elapsed: started.elapsed(),
                });
            }

            let delay = backoff_delay(&self.policy, attempt, self.jitter);
            self.observer.on_retry(attempt, &error, delay);
            sleep(delay).await;
        }

        Err(RetryError::NoAttempts)
    }
}
