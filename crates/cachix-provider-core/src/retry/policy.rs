use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_MAX: u32 = 3;
/// Default wait before the first retry.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);
/// Default upper bound on any single wait.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// Returns true for statuses worth retrying: rate limiting (429) and server errors (5xx).
///
/// Every other status, 4xx included, is terminal for the request.
pub fn should_retry(status: u16) -> bool {
    status >= 500 || status == 429
}

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Attempt budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with a ceiling and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `retry_max + 1`).
    pub retry_max: u32,
    /// Wait before the first retry.
    pub min_wait: Duration,
    /// Upper bound on any single wait.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_max: DEFAULT_RETRY_MAX,
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts a logical request may make.
    pub fn max_attempts(&self) -> u32 {
        self.retry_max.saturating_add(1)
    }

    /// Wait before retry number `attempt` (1-based): `min_wait * 2^(attempt-1)`, capped at `max_wait`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let raw = self.min_wait.saturating_mul(1u32 << exp);
        raw.min(self.max_wait)
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed retryably.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt > self.retry_max {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff(attempt))
    }
}
