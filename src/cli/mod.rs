//! CLI entry point for codex-sync.

pub mod auth;
pub mod sync;

use clap::{Parser, Subcommand};

/// Codex sync CLI
#[derive(Parser, Debug)]
#[command(name = "codex-sync", version, about = "Sync Codex saved items into your outline graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize this device against the Codex service
    Login,
    /// Remove the stored token
    Logout,
    /// Show authentication status
    Status,
    /// Pull saved items and reconcile them into the graph
    Sync,
}
