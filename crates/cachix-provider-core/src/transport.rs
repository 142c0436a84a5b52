//! One HTTP exchange over libcurl.
//!
//! A fresh `Easy` handle is used per attempt so nothing from a failed
//! transfer leaks into the next one. The transfer is blocking and runs on a
//! tokio blocking worker; the caller's cancellation token aborts it from the
//! progress callback.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::retry::{ClientError, TransportError};

/// Connection establishment timeout, separate from the whole-request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully built request for a single attempt.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Header lines as `Name: value`.
    pub headers: Vec<String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

/// Status and body of a completed exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success_among(&self, accepted: &[u16]) -> bool {
        accepted.contains(&self.status)
    }
}

/// Run one request to completion on a blocking worker.
///
/// Returns `Cancelled` as soon as `cancel` fires; the worker notices on its
/// next progress callback and aborts the transfer.
pub async fn send(request: Request, cancel: &CancellationToken) -> Result<RawResponse, ClientError> {
    let worker_cancel = cancel.clone();
    let handle = tokio::task::spawn_blocking(move || perform(&request, &worker_cancel));

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ClientError::Cancelled),
        joined = handle => match joined {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) if e.is_aborted_by_callback() => Err(ClientError::Cancelled),
            Ok(Err(e)) => Err(TransportError::Curl(e).into()),
            Err(e) => Err(TransportError::Worker(e).into()),
        },
    }
}

/// Blocking transfer. Runs in the current thread.
fn perform(request: &Request, cancel: &CancellationToken) -> Result<RawResponse, curl::Error> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(&request.url)?;
    easy.connect_timeout(CONNECT_TIMEOUT)?;
    easy.timeout(request.timeout)?;
    easy.progress(true)?;

    match request.method {
        Method::Get => easy.get(true)?,
        Method::Post => {
            easy.post(true)?;
            easy.post_fields_copy(request.body.as_deref().unwrap_or_default())?;
        }
        Method::Delete => {
            easy.custom_request(Method::Delete.as_str())?;
            if let Some(payload) = &request.body {
                easy.post_fields_copy(payload)?;
            }
        }
    }

    let mut list = curl::easy::List::new();
    for header in &request.headers {
        list.append(header)?;
    }
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        // Returning false aborts the transfer with CURLE_ABORTED_BY_CALLBACK.
        transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(RawResponse {
        status: u16::try_from(status).unwrap_or(u16::MAX),
        body,
    })
}
