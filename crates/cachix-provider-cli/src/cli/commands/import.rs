//! `cachix-provider cache import <name>` – adopt an existing cache by name.
//!
//! The name is the cache's identity, so importing is a read: it succeeds only
//! if the cache exists and prints what was found.

use anyhow::Result;
use cachix_provider_core::diagnostics::Operation;
use cachix_provider_core::CachixClient;
use tokio_util::sync::CancellationToken;

use super::{cache_context, failure, print_cache};

pub async fn run_import(client: &CachixClient, name: &str, cancel: &CancellationToken) -> Result<()> {
    let cache = client
        .get_cache(name, cancel)
        .await
        .map_err(|e| failure(&cache_context(name, Operation::Import), &e))?;
    tracing::info!(name = %cache.name, "imported cache");
    println!("Imported cache {}", cache.name);
    print_cache(&cache);
    Ok(())
}
