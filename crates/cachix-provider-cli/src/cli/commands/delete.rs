//! `cachix-provider cache delete <name>` – idempotent: an absent cache counts as deleted.

use anyhow::Result;
use cachix_provider_core::diagnostics::Operation;
use cachix_provider_core::{CachixClient, ClientError};
use tokio_util::sync::CancellationToken;

use super::{cache_context, failure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deleted {
    Now,
    AlreadyAbsent,
}

/// A not-found answer means the cache is gone either way.
fn settle(result: Result<(), ClientError>) -> Result<Deleted, ClientError> {
    match result {
        Ok(()) => Ok(Deleted::Now),
        Err(e) if e.is_not_found() => Ok(Deleted::AlreadyAbsent),
        Err(e) => Err(e),
    }
}

pub async fn run_delete(client: &CachixClient, name: &str, cancel: &CancellationToken) -> Result<()> {
    let result = client.delete_cache(name, cancel).await;
    match settle(result).map_err(|e| failure(&cache_context(name, Operation::Delete), &e))? {
        Deleted::Now => println!("Deleted cache {name}"),
        Deleted::AlreadyAbsent => {
            tracing::info!(name, "cache already absent");
            println!("Cache {name} does not exist; nothing to delete");
        }
    }
    Ok(())
}
