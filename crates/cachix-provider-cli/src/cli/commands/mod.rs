//! CLI command handlers, one per file.

mod completions;
mod create;
mod delete;
mod import;
mod refresh;
mod show;
mod user;

pub use completions::run_completions;
pub use create::run_create;
pub use delete::run_delete;
pub use import::run_import;
pub use refresh::run_refresh;
pub use show::run_show;
pub use user::run_user;

use cachix_provider_core::diagnostics::{describe, Diagnostic, ErrorContext, Operation};
use cachix_provider_core::{Cache, ClientError};

fn cache_context(name: &str, operation: Operation) -> ErrorContext<'_> {
    ErrorContext {
        resource_type: "Cache",
        resource_name: name,
        operation,
    }
}

/// Turn a client error into the diagnostic shown to the user.
fn failure(ctx: &ErrorContext<'_>, err: &ClientError) -> anyhow::Error {
    tracing::debug!(error = ?err, "operation failed");
    diagnostic_error(describe(ctx, err))
}

fn diagnostic_error(diagnostic: Diagnostic) -> anyhow::Error {
    anyhow::anyhow!("{}\n{}", diagnostic.summary, diagnostic.detail)
}

fn print_cache(cache: &Cache) {
    println!("{:<20} {}", "NAME", cache.name);
    println!("{:<20} {}", "URI", cache.uri);
    println!(
        "{:<20} {}",
        "VISIBILITY",
        if cache.is_public { "public" } else { "private" }
    );
    if let Some(created) = &cache.created_at {
        println!("{:<20} {}", "CREATED", created);
    }
    if cache.public_signing_keys.is_empty() {
        println!("{:<20} -", "SIGNING KEYS");
    } else {
        for (i, key) in cache.public_signing_keys.iter().enumerate() {
            let label = if i == 0 { "SIGNING KEYS" } else { "" };
            println!("{:<20} {}", label, key);
        }
    }
}
