//! Reconciliation of remote items into the outline graph.

pub mod render;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::TokenStore;
use crate::dates::format_page_key;
use crate::outline::{Block, OutlineError, OutlineStore, PageOptions};
use crate::remote::{CodexClient, RemoteError, RemoteItem};

pub use render::CONTAINER_MARKER;

/// Terminal result of one `sync()` invocation, rendered for the operator by
/// the caller.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// Another sync is still in flight; nothing was done.
    AlreadyRunning,
    /// No stored token, or the remote rejected ours. Nothing was written.
    NotAuthenticated,
    /// The item query failed for a non-auth reason. Nothing was written.
    RemoteFailed { message: String },
    Completed(SyncReport),
}

/// Per-invocation counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What happened to a single item during reconciliation.
enum ItemDisposition {
    Synced,
    AlreadyPresent,
}

/// Pulls the saved-item list and reconciles it into the outline store.
///
/// Invocations are serialized: the destination store's read-then-write
/// existence checks are not atomic against a concurrent sync, so a second
/// call while one is in flight is rejected rather than interleaved.
pub struct Synchronizer {
    client: CodexClient,
    tokens: Arc<dyn TokenStore>,
    outline: Arc<dyn OutlineStore>,
    date_format: String,
    gate: tokio::sync::Mutex<()>,
}

impl Synchronizer {
    pub fn new(
        client: CodexClient,
        tokens: Arc<dyn TokenStore>,
        outline: Arc<dyn OutlineStore>,
        date_format: String,
    ) -> Self {
        Self {
            client,
            tokens,
            outline,
            date_format,
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Fetch the remote item list and reconcile it, item by item, in the
    /// order the server returned.
    ///
    /// Sync never triggers authentication itself: without a usable token it
    /// reports [`SyncOutcome::NotAuthenticated`] and issues no item query.
    /// A failure on one item is logged and counted; the remaining items are
    /// still processed.
    pub async fn sync(&self) -> SyncOutcome {
        let _guard = match self.gate.try_lock() {
            Ok(guard) => guard,
            Err(_) => return SyncOutcome::AlreadyRunning,
        };

        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return SyncOutcome::NotAuthenticated,
            Err(err) => {
                return SyncOutcome::RemoteFailed {
                    message: format!("token store unavailable: {err}"),
                }
            }
        };

        let items = match self.client.fetch_items(&token.access_token).await {
            Ok(items) => items,
            Err(RemoteError::Unauthorized) => return SyncOutcome::NotAuthenticated,
            Err(err) => {
                return SyncOutcome::RemoteFailed {
                    message: err.to_string(),
                }
            }
        };

        info!(count = items.len(), "sync started");
        let mut report = SyncReport::default();
        for item in &items {
            match self.ensure_item_present(item).await {
                Ok(ItemDisposition::Synced) => report.synced += 1,
                Ok(ItemDisposition::AlreadyPresent) => report.skipped += 1,
                Err(err) => {
                    warn!(item = %item.id, error = %err, "item reconciliation failed");
                    report.failed += 1;
                }
            }
        }
        info!(
            synced = report.synced,
            skipped = report.skipped,
            failed = report.failed,
            "sync completed"
        );
        SyncOutcome::Completed(report)
    }

    /// Idempotent "ensure item present" for one remote item.
    ///
    /// Two existence checks guard against duplicates: the global id lookup,
    /// and a scan of the container's children for items the store has
    /// accepted but not indexed yet. Both run within this single turn; the
    /// pair is a best-effort guard, not a transaction.
    async fn ensure_item_present(
        &self,
        item: &RemoteItem,
    ) -> Result<ItemDisposition, OutlineError> {
        let page_key = format_page_key(item.created_at, &self.date_format);

        if self.outline.get_block_by_id(&item.id).await?.is_some() {
            debug!(item = %item.id, "already synced");
            return Ok(ItemDisposition::AlreadyPresent);
        }

        let mut container: Option<Block> = None;
        if self.outline.get_page(&page_key).await?.is_some() {
            let tree = self.outline.page_blocks_tree(&page_key).await?;
            container = tree
                .into_iter()
                .find(|block| block.content.starts_with(CONTAINER_MARKER));
            if let Some(found) = &container {
                let already = found
                    .children
                    .iter()
                    .any(|child| child.properties.get("id") == Some(&item.id));
                if already {
                    debug!(item = %item.id, "present but not indexed yet");
                    return Ok(ItemDisposition::AlreadyPresent);
                }
            }
        } else {
            self.outline
                .create_page(
                    &page_key,
                    PageOptions {
                        journal: true,
                        redirect: false,
                    },
                )
                .await?;
        }

        let container = match container {
            Some(block) => block,
            None => {
                debug!(page = %page_key, "creating container block");
                self.outline
                    .append_block_in_page(&page_key, CONTAINER_MARKER)
                    .await?
            }
        };

        let item_block = self
            .outline
            .insert_block(&container.uuid, &render::item_text(item))
            .await?;

        if let Some(thumbnail) = item.thumbnail() {
            // Partial failure here leaves a visible but incomplete entry;
            // the id property already gates re-sync, so the item still
            // counts as synced.
            if let Err(err) = self.attach_thumbnail(&item_block, thumbnail).await {
                warn!(item = %item.id, error = %err, "thumbnail attachment failed");
            }
        }

        debug!(item = %item.id, page = %page_key, "item synced");
        Ok(ItemDisposition::Synced)
    }

    async fn attach_thumbnail(&self, item_block: &Block, url: &str) -> Result<(), OutlineError> {
        self.outline
            .set_block_collapsed(&item_block.uuid, true)
            .await?;
        self.outline
            .insert_block(&item_block.uuid, &render::thumbnail_text(url))
            .await?;
        Ok(())
    }
}
