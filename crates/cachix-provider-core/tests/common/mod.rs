#![allow(dead_code)]

pub mod mock_api;

use std::time::Duration;

use cachix_provider_core::retry::RetryPolicy;
use cachix_provider_core::{CachixClient, ClientConfig};

pub const TOKEN: &str = "test-token";

/// Retry policy with the default budget but millisecond waits.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        min_wait: Duration::from_millis(10),
        max_wait: Duration::from_millis(40),
        ..RetryPolicy::default()
    }
}

pub fn client_with_policy(base_url: &str, policy: RetryPolicy) -> CachixClient {
    let config = ClientConfig::new(base_url, TOKEN, "test")
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_retry_policy(policy);
    CachixClient::new(config)
}

pub fn fast_client(base_url: &str) -> CachixClient {
    client_with_policy(base_url, fast_policy())
}
