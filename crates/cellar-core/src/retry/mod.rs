//! Retrying of fallible async operations
//!
//! Every vault request runs through a [`Retrier`], so backoff behaviour comes
//! from the configured [`RetryPolicy`](crate::types::RetryPolicy) rather than
//! from ad-hoc loops at call sites.
//!
//! ```rust,no_run
//! use cellar_core::retry::{HttpStatusPredicate, Retrier, RetryError, TracingObserver};
//! use cellar_core::types::RetryPolicy;
//!
//! async fn fetch() -> Result<u16, RetryError<std::io::Error>> {
//!     Retrier::new(RetryPolicy::default(), |_: &std::io::Error| true)
//!         .with_observer(TracingObserver::new("fetch"))
//!         .run(|| async { Ok(200) })
//!         .await
//! }
//! ```

mod backoff;
mod classify;
mod error;
mod observer;
mod runner;

pub use backoff::backoff_delay;
pub use classify::{HttpStatusError, HttpStatusPredicate, RetryPredicate};
pub use error::RetryError;
pub use observer::{RetryObserver, TracingObserver};
pub use runner::Retrier;
