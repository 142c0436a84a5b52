//! Wire types for the Cachix API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary cache hosted by Cachix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    pub name: String,
    pub uri: String,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    /// Empty for private caches and caches without generated keys.
    #[serde(rename = "publicSigningKeys", default)]
    pub public_signing_keys: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "githubUsername")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "fullname", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "subscriptionPlan", default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
}

/// Body of `POST /cache/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCacheRequest {
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(rename = "generateSigningKey")]
    pub generate_signing_key: bool,
    #[serde(rename = "accountID")]
    pub account_id: i64,
}

impl CreateCacheRequest {
    /// Signing key generation is always requested.
    pub fn new(is_public: bool, account_id: i64) -> Self {
        Self {
            is_public,
            generate_signing_key: true,
            account_id,
        }
    }
}

/// Rejected cache name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCacheName(pub String);

impl fmt::Display for InvalidCacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid cache name {:?}: must start with a lowercase letter and contain only lowercase letters, numbers, and hyphens",
            self.0
        )
    }
}

impl std::error::Error for InvalidCacheName {}

/// Accepts `^[a-z][a-z0-9-]*$`.
pub fn validate_cache_name(name: &str) -> Result<(), InvalidCacheName> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(InvalidCacheName(name.to_string()))
    }
}
