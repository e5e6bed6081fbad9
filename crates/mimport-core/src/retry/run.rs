//! Retry loop: run a closure until success or the policy says stop.

use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` (given the 1-based attempt number) until it succeeds or the
/// attempt budget is spent. `on_failure` sees every failed attempt before the
/// backoff sleep. No sleep follows the final attempt.
pub fn run_with_retry<T, F, N>(
    policy: &RetryPolicy,
    mut f: F,
    mut on_failure: N,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
    N: FnMut(u32, &FetchError),
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                on_failure(attempt, &e);
                match policy.decide(attempt) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
