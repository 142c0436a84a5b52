//! Cache and user operations on top of [`CachixClient::execute`].

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::CachixClient;
use crate::model::{Cache, CreateCacheRequest, User};
use crate::retry::{classify, ClientError};
use crate::transport::{Method, RawResponse};

/// Request bodies are never sent for GET/DELETE; this names the absent type.
const NO_BODY: Option<&()> = None;

fn cache_path(name: &str) -> String {
    format!("/cache/{name}")
}

/// Classify the response unless its status is one of `accepted`.
fn expect_status(response: RawResponse, accepted: &[u16]) -> Result<RawResponse, ClientError> {
    if response.is_success_among(accepted) {
        Ok(response)
    } else {
        Err(classify(response.status, &response.body).into())
    }
}

fn decode<T: DeserializeOwned>(what: &'static str, body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { what, source })
}

impl CachixClient {
    /// `GET /cache/{name}`.
    pub async fn get_cache(&self, name: &str, cancel: &CancellationToken) -> Result<Cache, ClientError> {
        tracing::debug!(name, "getting cache");

        let response = self.execute(Method::Get, &cache_path(name), NO_BODY, cancel).await?;
        let response = expect_status(response, &[200])?;
        let cache: Cache = decode("cache", &response.body)?;

        tracing::debug!(name = %cache.name, uri = %cache.uri, is_public = cache.is_public, "got cache");
        Ok(cache)
    }

    /// Create a cache and return it as the API now reports it.
    ///
    /// Looks up the current user for the account id, posts the creation
    /// request (the endpoint answers with an empty body), then reads the cache
    /// back. A failure in that last read means the cache does exist remotely.
    pub async fn create_cache(
        &self,
        name: &str,
        is_public: bool,
        cancel: &CancellationToken,
    ) -> Result<Cache, ClientError> {
        tracing::debug!(name, is_public, "creating cache");

        let user = self
            .get_user(cancel)
            .await
            .map_err(|e| ClientError::UserLookup(Box::new(e)))?;

        let request = CreateCacheRequest::new(is_public, user.id);
        let response = self
            .execute(Method::Post, &cache_path(name), Some(&request), cancel)
            .await?;
        expect_status(response, &[200, 201])?;

        let cache = self
            .get_cache(name, cancel)
            .await
            .map_err(|e| ClientError::CreatedButUnreadable(Box::new(e)))?;

        tracing::info!(name = %cache.name, uri = %cache.uri, is_public = cache.is_public, "created cache");
        Ok(cache)
    }

    /// `DELETE /cache/{name}`. A cache that is already gone yields a not-found error.
    pub async fn delete_cache(&self, name: &str, cancel: &CancellationToken) -> Result<(), ClientError> {
        tracing::debug!(name, "deleting cache");

        let response = self
            .execute(Method::Delete, &cache_path(name), NO_BODY, cancel)
            .await?;
        expect_status(response, &[200, 204])?;

        tracing::info!(name, "deleted cache");
        Ok(())
    }

    /// `GET /user`: the principal the token belongs to.
    pub async fn get_user(&self, cancel: &CancellationToken) -> Result<User, ClientError> {
        tracing::debug!("getting current user");

        let response = self.execute(Method::Get, "/user", NO_BODY, cancel).await?;
        let response = expect_status(response, &[200])?;
        let user: User = decode("user", &response.body)?;

        tracing::debug!(username = %user.username, "got user");
        Ok(user)
    }
}
