//! Gitdock - Desktop Git client core
//!
//! Gitdock manages addressable per-repository contexts and runs
//! opinionated git workflows on the active one: auto-stash-aware pulls
//! and behind-check-aware commits.

mod cli;
mod config;
mod error;
mod git;
mod ops;
mod repository;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::repository::{legacy, RepositoryManager};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GITDOCK_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the command
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config()?;
    let manager = RepositoryManager::new(config.git.remote.clone());

    // Keep the legacy globals in sync with the active context for the
    // call sites that still read them.
    legacy::install(&manager);

    match cli.command {
        Commands::Open { path } => cli::commands::handle_open(&manager, path).await,
        Commands::Status => cli::commands::handle_status(&manager).await,
        Commands::Pull => cli::commands::handle_pull(&manager, &config).await,
        Commands::Commit {
            message,
            description,
            force,
        } => {
            cli::commands::handle_commit(&manager, &config, &message, description.as_deref(), force)
                .await
        }
        Commands::Repos { limit } => cli::commands::handle_repos(limit),
        Commands::Close => cli::commands::handle_close(&manager).await,
        Commands::Completions { shell } => cli::commands::handle_completions(shell),
    }
}
