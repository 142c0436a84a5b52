//! `cachix-provider cache create <name> [--private]`.

use anyhow::Result;
use cachix_provider_core::diagnostics::Operation;
use cachix_provider_core::CachixClient;
use tokio_util::sync::CancellationToken;

use super::{cache_context, failure, print_cache};

pub async fn run_create(
    client: &CachixClient,
    name: &str,
    is_public: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let cache = client
        .create_cache(name, is_public, cancel)
        .await
        .map_err(|e| failure(&cache_context(name, Operation::Create), &e))?;
    println!("Created cache {}", cache.name);
    print_cache(&cache);
    Ok(())
}
