//! Delay between attempts

use crate::types::{RetryPolicy, RetryStrategy};
use rand::RngExt;
use std::time::Duration;

/// Delay to wait after the `failed_attempt`-th attempt (1-indexed) failed
///
/// The strategy's base delay is capped at `max_delay_ms`. With `jitter`, up to
/// a quarter of the capped delay is added at random.
///
/// ```rust
/// use cellar_core::retry::backoff_delay;
/// use cellar_core::types::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(backoff_delay(&policy, 1, false).as_millis(), 250);
/// assert_eq!(backoff_delay(&policy, 3, false).as_millis(), 1000);
/// ```
pub fn backoff_delay(policy: &RetryPolicy, failed_attempt: u32, jitter: bool) -> Duration {
    let exponent = failed_attempt.saturating_sub(1) as i32;
    let base_ms = match policy.strategy {
        RetryStrategy::None => 0,
        RetryStrategy::FixedDelay => policy.initial_delay_ms,
        RetryStrategy::ExponentialBackoff => {
            (policy.initial_delay_ms as f64 * policy.backoff_multiplier.powi(exponent)) as u64
        }
    };

    let delay_ms = base_ms.min(policy.max_delay_ms);
    let spread = if jitter { delay_ms / 4 } else { 0 };
    let extra = if spread > 0 {
        rand::rng().random_range(0..=spread)
    } else {
        0
    };

    Duration::from_millis(delay_ms + extra)
}
