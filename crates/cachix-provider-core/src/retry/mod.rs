//! Retry and backoff policy.
//!
//! Status classification, exponential backoff and the attempt loop live here
//! so every API operation shares one policy and one error taxonomy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::classify;
pub use error::{is_not_found_error, ApiError, ClientError, ErrorKind, TransportError};
pub use policy::{
    should_retry, RetryDecision, RetryPolicy, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT,
    DEFAULT_RETRY_MAX,
};
pub use run::run_with_retry;
