//! CLI handler for the sync command.

use std::sync::Arc;

use crate::auth::FileTokenStore;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::outline::LogseqOutline;
use crate::remote::CodexClient;
use crate::sync::{SyncOutcome, Synchronizer};

/// Handle `codex-sync sync`.
pub async fn handle_sync(config: &SyncConfig) -> Result<()> {
    let tokens = Arc::new(FileTokenStore::new(config.data_dir.clone()));
    let outline = Arc::new(LogseqOutline::new(
        config.logseq_api_url.clone(),
        config.logseq_api_token.clone(),
    ));
    let client = CodexClient::new(config.graphql_url());
    let sync = Synchronizer::new(client, tokens, outline, config.date_format.clone());

    match sync.sync().await {
        SyncOutcome::AlreadyRunning => {
            eprintln!("⏳ A sync is already in progress");
            Ok(())
        }
        SyncOutcome::NotAuthenticated => {
            eprintln!("❌ Not authenticated, run `codex-sync login` first");
            std::process::exit(1);
        }
        SyncOutcome::RemoteFailed { message } => {
            eprintln!("❌ Sync failed, please try again later ({message})");
            std::process::exit(1);
        }
        SyncOutcome::Completed(report) => {
            println!(
                "✅ Sync complete: {} synced, {} already present, {} failed",
                report.synced, report.skipped, report.failed
            );
            Ok(())
        }
    }
}
