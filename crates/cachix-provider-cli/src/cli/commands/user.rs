//! `cachix-provider user` – show the authenticated user.

use anyhow::Result;
use cachix_provider_core::diagnostics::{ErrorContext, Operation};
use cachix_provider_core::CachixClient;
use tokio_util::sync::CancellationToken;

use super::failure;

pub async fn run_user(client: &CachixClient, cancel: &CancellationToken) -> Result<()> {
    let ctx = ErrorContext {
        resource_type: "User",
        resource_name: "current user",
        operation: Operation::Read,
    };
    let user = client.get_user(cancel).await.map_err(|e| failure(&ctx, &e))?;

    println!("{:<20} {}", "ID", user.id);
    println!("{:<20} {}", "USERNAME", user.username);
    let optional = [
        ("EMAIL", &user.email),
        ("NAME", &user.full_name),
        ("PLAN", &user.subscription_plan),
    ];
    for (label, value) in optional {
        println!("{:<20} {}", label, value.as_deref().unwrap_or("-"));
    }
    Ok(())
}
