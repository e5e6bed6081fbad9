//! Retry and backoff policy.
//!
//! Every failed attempt is retried until the attempt budget is spent; the
//! wait before attempt N+1 grows linearly with N.

mod error;
mod policy;
mod run;

pub use error::FetchError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
