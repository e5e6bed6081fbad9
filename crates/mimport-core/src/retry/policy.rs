use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up; the attempt budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded retry with linear backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Zero is treated as one.
    pub max_attempts: u32,
    /// Delay unit; the wait after attempt N is `base_delay * N`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after attempt `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts.max(1) {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(attempt))
    }
}
