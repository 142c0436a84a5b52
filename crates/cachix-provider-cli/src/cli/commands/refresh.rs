//! `cachix-provider cache refresh <name>` – re-read a managed cache and detect drift.
//!
//! A cache deleted outside this tool is reported as removed instead of failing,
//! so callers can forget it and recreate it.

use anyhow::Result;
use cachix_provider_core::diagnostics::{not_found_as_removed, Operation, ReadOutcome};
use cachix_provider_core::CachixClient;
use tokio_util::sync::CancellationToken;

use super::{cache_context, diagnostic_error, print_cache};

pub async fn run_refresh(client: &CachixClient, name: &str, cancel: &CancellationToken) -> Result<()> {
    match client.get_cache(name, cancel).await {
        Ok(cache) => print_cache(&cache),
        Err(e) => match not_found_as_removed(&cache_context(name, Operation::Read), &e) {
            ReadOutcome::Removed => {
                tracing::warn!(name, "cache no longer exists remotely");
                println!("Cache {name} no longer exists remotely; treat it as removed");
            }
            ReadOutcome::Failed(diagnostic) => return Err(diagnostic_error(diagnostic)),
        },
    }
    Ok(())
}
