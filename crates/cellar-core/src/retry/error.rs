//! Outcome of a retried operation that never succeeded

use std::error::Error;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetryError<E: Error + 'static> {
    /// Every allowed attempt failed with a transient error
    #[error("gave up after {attempts} attempt(s) in {:.2}s: {last}", .elapsed.as_secs_f64())]
    Exhausted {
        attempts: u32,
        #[source]
        last: E,
        elapsed: Duration,
    },

    /// The predicate classified the failure as permanent
    #[error("permanent failure on attempt {attempt}: {error}")]
    Permanent {
        attempt: u32,
        #[source]
        error: E,
    },

    /// The policy allows zero attempts
    #[error("retry policy allows no attempts")]
    NoAttempts,
}

impl<E: Error + 'static> RetryError<E> {
    /// Attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Permanent { attempt, .. } => *attempt,
            RetryError::NoAttempts => 0,
        }
    }

    /// The last error seen, if any attempt ran
    pub fn into_last_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { last, .. } => Some(last),
            RetryError::Permanent { error, .. } => Some(error),
            RetryError::NoAttempts => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn timeout() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "connection timeout")
    }

    #[test]
    fn test_exhausted_display_and_source() {
        let err = RetryError::Exhausted {
            attempts: 3,
            last: timeout(),
            elapsed: Duration::from_millis(1500),
        };

        assert_eq!(
            err.to_string(),
            "gave up after 3 attempt(s) in 1.50s: connection timeout"
        );
        assert!(err.source().is_some());
        assert_eq!(err.attempts(), 3);
    }

    #[test]
    fn test_into_last_error() {
        let err = RetryError::Permanent {
            attempt: 1,
            error: timeout(),
        };
        assert_eq!(err.attempts(), 1);
        assert_eq!(
            err.into_last_error().map(|e| e.kind()),
            Some(io::ErrorKind::TimedOut)
        );
        assert!(RetryError::<io::Error>::NoAttempts.into_last_error().is_none());
    }
}
