//! codex-sync CLI binary entry point.

use clap::Parser;
use codex_sync::cli::{Cli, Commands};
use codex_sync::config::SyncConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = SyncConfig::from_env();

    let result = match cli.command {
        Commands::Login => codex_sync::cli::auth::handle_login(&config).await,
        Commands::Logout => codex_sync::cli::auth::handle_logout(&config).await,
        Commands::Status => codex_sync::cli::auth::handle_status(&config).await,
        Commands::Sync => codex_sync::cli::sync::handle_sync(&config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
