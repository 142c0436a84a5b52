//! Cachix API client: request execution with retries, plus typed operations.

mod operations;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::retry::{run_with_retry, ClientError};
use crate::transport::{self, Method, RawResponse, Request};

/// Client for the Cachix REST API.
///
/// Holds only read-only configuration, so one instance can serve concurrent
/// calls; every attempt opens its own transfer.
#[derive(Debug, Clone)]
pub struct CachixClient {
    config: ClientConfig,
    user_agent: String,
}

impl CachixClient {
    pub fn new(config: ClientConfig) -> Self {
        let user_agent = config.user_agent();
        Self { config, user_agent }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn headers(&self) -> Vec<String> {
        vec![
            format!("Authorization: Bearer {}", self.config.token),
            "Content-Type: application/json".to_string(),
            "Accept: application/json".to_string(),
            format!("User-Agent: {}", self.user_agent),
        ]
    }

    /// Perform one logical request with the configured retry policy.
    ///
    /// Returns the first non-retryable response whatever its status; the
    /// caller decides which statuses mean success. The body is serialized
    /// afresh for every attempt.
    pub(crate) async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<RawResponse, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        run_with_retry(&self.config.retry, cancel, |attempt| {
            let prepared = body
                .map(serde_json::to_vec)
                .transpose()
                .map_err(ClientError::Encode)
                .map(|payload| Request {
                    method,
                    url: url.clone(),
                    headers: self.headers(),
                    body: payload,
                    timeout: self.config.timeout,
                });
            tracing::debug!(%method, url = %url, attempt, "making Cachix API request");
            async move { transport::send(prepared?, cancel).await }
        })
        .await
    }
}
