//! Error taxonomy for API requests.

use std::fmt;
use thiserror::Error;

use super::policy::should_retry;

/// Structured failure returned by the Cachix API.
///
/// `message` is the classified human text and may be empty (retryable
/// responses are recorded unclassified); `body` keeps the raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub body: String,
}

impl ApiError {
    /// Record a response without extracting a message from it.
    pub fn unclassified(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            message: String::new(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    pub fn is_retryable(&self) -> bool {
        should_retry(self.status)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.message.is_empty() {
            &self.body
        } else {
            &self.message
        };
        write!(f, "cachix API error (status {}): {}", self.status, text)
    }
}

impl std::error::Error for ApiError {}

/// Failure below HTTP: no status code was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    /// libcurl failed (connect, DNS, timeout, body read).
    #[error("failed to execute request")]
    Curl(#[source] curl::Error),
    /// The blocking worker running the transfer panicked or was shut down.
    #[error("transfer worker failed")]
    Worker(#[source] tokio::task::JoinError),
}

/// Coarse classification callers can match on instead of inspecting variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, timeout or body-read failure.
    Transport,
    /// 429 or 5xx.
    RetryableApi,
    /// Any other non-success status.
    NonRetryableApi,
    /// JSON that could not be decoded (or a request body that could not be encoded).
    Decode,
    /// Caller cancelled the operation.
    Cancelled,
}

/// Error returned by every client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to decode {what} response")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("max retries exceeded after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },

    #[error("failed to get user for cache creation")]
    UserLookup(#[source] Box<ClientError>),

    #[error("cache created but failed to fetch details")]
    CreatedButUnreadable(#[source] Box<ClientError>),
}

impl ClientError {
    /// Kind of the underlying failure; wrappers report the kind of what they carry.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Api(e) if e.is_retryable() => ErrorKind::RetryableApi,
            ClientError::Api(_) => ErrorKind::NonRetryableApi,
            ClientError::Decode { .. } | ClientError::Encode(_) => ErrorKind::Decode,
            ClientError::Cancelled => ErrorKind::Cancelled,
            ClientError::RetriesExhausted { last, .. } => last.kind(),
            ClientError::UserLookup(inner) | ClientError::CreatedButUnreadable(inner) => {
                inner.kind()
            }
        }
    }

    /// The API error this failure carries, looking through wrappers.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            ClientError::RetriesExhausted { last, .. } => last.api_error(),
            ClientError::UserLookup(inner) | ClientError::CreatedButUnreadable(inner) => {
                inner.api_error()
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }

    pub fn is_retries_exhausted(&self) -> bool {
        match self {
            ClientError::RetriesExhausted { .. } => true,
            ClientError::UserLookup(inner) | ClientError::CreatedButUnreadable(inner) => {
                inner.is_retries_exhausted()
            }
            _ => false,
        }
    }
}

/// True when `err`, or anything in its source chain, is a 404 from the API.
///
/// Works on errors that were wrapped further up (e.g. in `anyhow`).
pub fn is_not_found_error(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(client) = e.downcast_ref::<ClientError>() {
            if client.is_not_found() {
                return true;
            }
        } else if let Some(api) = e.downcast_ref::<ApiError>() {
            return api.is_not_found();
        }
        current = e.source();
    }
    false
}
