//! CLI for managing Cachix caches.

mod commands;

use anyhow::Result;
use cachix_provider_core::config::{self, Overrides};
use cachix_provider_core::model::validate_cache_name;
use cachix_provider_core::{CachixClient, ClientConfig};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use tokio_util::sync::CancellationToken;

use commands::{
    run_completions, run_create, run_delete, run_import, run_refresh, run_show, run_user,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cachix-provider")]
#[command(about = "Manage Cachix binary caches", long_about = None)]
pub struct Cli {
    /// Cachix API token (overrides the config file and CACHIX_AUTH_TOKEN).
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Cachix API base URL (default https://app.cachix.org/api/v1).
    #[arg(long, global = true, value_name = "URL")]
    pub api_host: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Cache operations.
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Show the user the token belongs to.
    User,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show a cache.
    Show {
        /// Cache name.
        #[arg(value_parser = parse_cache_name)]
        name: String,
    },

    /// Create a cache with a generated signing key.
    Create {
        /// Cache name: lowercase letters, digits and hyphens, starting with a letter.
        #[arg(value_parser = parse_cache_name)]
        name: String,

        /// Make the cache private (caches are public by default).
        #[arg(long)]
        private: bool,
    },

    /// Delete a cache. Deleting a cache that does not exist succeeds.
    Delete {
        /// Cache name.
        #[arg(value_parser = parse_cache_name)]
        name: String,
    },

    /// Adopt an existing cache by name; fails if it does not exist.
    Import {
        /// Cache name.
        #[arg(value_parser = parse_cache_name)]
        name: String,
    },

    /// Re-read a cache; reports it as removed if it no longer exists.
    Refresh {
        /// Cache name.
        #[arg(value_parser = parse_cache_name)]
        name: String,
    },
}

fn parse_cache_name(s: &str) -> Result<String, cachix_provider_core::model::InvalidCacheName> {
    validate_cache_name(s)?;
    Ok(s.to_string())
}

/// Cancelled on ctrl-c so a waiting retry loop returns promptly.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; cancelling request");
            trigger.cancel();
        }
    });
    cancel
}

/// Resolve configuration and build a client. Fails before any request when no token is set.
fn connect(overrides: &Overrides) -> Result<CachixClient> {
    let cfg = config::load_or_init()?;
    let client_cfg = ClientConfig::from_env(&cfg, overrides, env!("CARGO_PKG_VERSION"))?;
    tracing::debug!("loaded config: {:?}", client_cfg);
    Ok(CachixClient::new(client_cfg))
}

async fn run_cache(client: &CachixClient, command: CacheCommand, cancel: &CancellationToken) -> Result<()> {
    match command {
        CacheCommand::Show { name } => run_show(client, &name, cancel).await,
        CacheCommand::Create { name, private } => run_create(client, &name, !private, cancel).await,
        CacheCommand::Delete { name } => run_delete(client, &name, cancel).await,
        CacheCommand::Import { name } => run_import(client, &name, cancel).await,
        CacheCommand::Refresh { name } => run_refresh(client, &name, cancel).await,
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let overrides = Overrides {
            token: cli.token,
            api_host: cli.api_host,
        };

        match cli.command {
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::User => {
                let client = connect(&overrides)?;
                run_user(&client, &cancel_on_ctrl_c()).await?;
            }
            CliCommand::Cache(command) => {
                let client = connect(&overrides)?;
                run_cache(&client, command, &cancel_on_ctrl_c()).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
