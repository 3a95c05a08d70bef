//! Narrow interface over the destination outline-document store.
//!
//! The synchronizer consumes the store exclusively through [`OutlineStore`];
//! the concrete backend is an external collaborator. [`LogseqOutline`] talks
//! to a running Logseq desktop over its local HTTP API, and [`MemoryOutline`]
//! is a deterministic in-process store used by the test suite.

pub mod logseq;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use logseq::LogseqOutline;
pub use memory::MemoryOutline;

/// Errors from destination-store operations.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Outline API error: {0}")]
    Api(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for OutlineError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

/// One node of the outline tree.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub uuid: String,
    pub content: String,
    pub children: Vec<Block>,
    pub properties: HashMap<String, String>,
}

/// A page of the outline graph, keyed by name.
#[derive(Debug, Clone)]
pub struct Page {
    pub name: String,
}

/// Options for page creation.
#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    /// Create as a date/journal page.
    pub journal: bool,
    /// Redirect editor focus to the new page.
    pub redirect: bool,
}

/// Editing surface of the destination store.
#[async_trait]
pub trait OutlineStore: Send + Sync {
    /// Look up a block by its `id` property, anywhere in the graph.
    async fn get_block_by_id(&self, id: &str) -> Result<Option<Block>, OutlineError>;

    async fn get_page(&self, name: &str) -> Result<Option<Page>, OutlineError>;

    async fn create_page(&self, name: &str, options: PageOptions) -> Result<(), OutlineError>;

    /// Top-level blocks of a page, with children populated.
    async fn page_blocks_tree(&self, name: &str) -> Result<Vec<Block>, OutlineError>;

    /// Append a new top-level block to a page.
    async fn append_block_in_page(&self, name: &str, content: &str)
        -> Result<Block, OutlineError>;

    /// Insert a new child block under the given parent.
    async fn insert_block(&self, parent_uuid: &str, content: &str)
        -> Result<Block, OutlineError>;

    async fn set_block_collapsed(&self, uuid: &str, collapsed: bool) -> Result<(), OutlineError>;
}
