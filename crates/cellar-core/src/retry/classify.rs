//! Deciding which failures are worth another attempt

/// Classifies an error as transient (retry) or permanent (give up)
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    fn should_retry(&self, error: &E) -> bool;
}

impl<E: ?Sized, F> RetryPredicate<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        self(error)
    }
}

/// Errors that may carry an HTTP status
pub trait HttpStatusError {
    /// `None` when the request never got a response
    fn status_code(&self) -> Option<u16>;
}

/// Retries transient HTTP statuses and failures without a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusPredicate {
    codes: Vec<u16>,
}

impl HttpStatusPredicate {
    /// Request timeout, too early, rate limiting and transient server errors
    pub const DEFAULT_CODES: [u16; 7] = [408, 425, 429, 500, 502, 503, 504];

    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn is_retryable_code(&self, code: u16) -> bool {
        self.codes.contains(&code)
    }
}

impl Default for HttpStatusPredicate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CODES)
    }
}

impl<E: HttpStatusError> RetryPredicate<E> for HttpStatusPredicate {
    fn should_retry(&self, error: &E) -> bool {
        match error.status_code() {
            Some(code) => self.is_retryable_code(code),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failure(Option<u16>);

    impl HttpStatusError for Failure {
        fn status_code(&self) -> Option<u16> {
            self.0
        }
    }

    #[test]
    fn test_default_codes() {
        let predicate = HttpStatusPredicate::default();
        for code in [408, 425, 429, 500, 502, 503, 504] {
            assert!(predicate.should_retry(&Failure(Some(code))), "{}", code);
        }
        for code in [400, 401, 403, 404, 409, 501] {
            assert!(!predicate.should_retry(&Failure(Some(code))), "{}", code);
        }
    }

    #[test]
    fn test_missing_status_is_retried() {
        assert!(HttpStatusPredicate::default().should_retry(&Failure(None)));
        assert!(HttpStatusPredicate::new([]).should_retry(&Failure(None)));
    }

    #[test]
    fn test_custom_codes() {
        let predicate = HttpStatusPredicate::new([418]);
        assert!(predicate.should_retry(&Failure(Some(418))));
        assert!(!predicate.should_retry(&Failure(Some(503))));
    }

    #[test]
    fn test_closure_predicate() {
        let only_even = |n: &u32| n % 2 == 0;
        assert!(only_even.should_retry(&4));
        assert!(!only_even.should_retry(&3));
    }
}
