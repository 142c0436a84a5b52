//! Retry loop: run attempts until a terminal response, cancellation, or the budget runs out.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::error::{ApiError, ClientError, ErrorKind};
use super::policy::{should_retry, RetryDecision, RetryPolicy};
use crate::transport::RawResponse;

/// Runs `attempt_fn` (given the 1-based attempt number) until it yields a
/// non-retryable response.
///
/// Retryable statuses and transport failures are recorded as the last error
/// and retried after the policy's backoff; the wait is abandoned with
/// `Cancelled` if `cancel` fires. Any other error from `attempt_fn` is
/// returned as is. When the budget is spent the last error is wrapped in
/// `RetriesExhausted`.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut attempt_fn: F,
) -> Result<RawResponse, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<RawResponse, ClientError>>,
{
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let failure = match attempt_fn(attempt).await {
            Ok(response) if !should_retry(response.status) => return Ok(response),
            Ok(response) => ClientError::Api(ApiError::unclassified(response.status, &response.body)),
            Err(e) if e.kind() == ErrorKind::Transport => e,
            Err(e) => return Err(e),
        };

        match policy.decide(attempt) {
            RetryDecision::NoRetry => {
                return Err(ClientError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(failure),
                });
            }
            RetryDecision::RetryAfter(wait) => {
                tracing::debug!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %failure,
                    "retrying request after transient error"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(ClientError::Cancelled),
                    () = tokio::time::sleep(wait) => {}
                }
                attempt += 1;
            }
        }
    }
}
