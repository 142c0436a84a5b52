//! `cachix-provider cache show <name>` – read a cache; a missing cache is an error.

use anyhow::Result;
use cachix_provider_core::diagnostics::Operation;
use cachix_provider_core::CachixClient;
use tokio_util::sync::CancellationToken;

use super::{cache_context, failure, print_cache};

pub async fn run_show(client: &CachixClient, name: &str, cancel: &CancellationToken) -> Result<()> {
    let cache = client
        .get_cache(name, cancel)
        .await
        .map_err(|e| failure(&cache_context(name, Operation::Read), &e))?;
    print_cache(&cache);
    Ok(())
}
