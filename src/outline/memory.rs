use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Block, OutlineError, OutlineStore, Page, PageOptions};

/// Deterministic in-process outline store.
///
/// Inserted content is parsed for `key:: value` property lines so the `id`
/// dedup key behaves like the real store's index. Indexing can be paused to
/// model the lag between a write and its queryability, which is what the
/// synchronizer's secondary existence check exists for.
#[derive(Default)]
pub struct MemoryOutline {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    pages: Vec<MemoryPage>,
    collapsed: HashMap<String, bool>,
    next_uuid: u64,
    index_paused: bool,
}

struct MemoryPage {
    name: String,
    journal: bool,
    blocks: Vec<Block>,
}

impl MemoryOutline {
    pub fn new() -> Self {
        Self::default()
    }

    /// While paused, `get_block_by_id` pretends nothing is indexed yet.
    pub fn pause_indexing(&self, paused: bool) {
        self.lock().index_paused = paused;
    }

    /// Names of all pages, in creation order.
    pub fn page_names(&self) -> Vec<String> {
        self.lock().pages.iter().map(|p| p.name.clone()).collect()
    }

    /// Whether the page was created as a journal page.
    pub fn is_journal(&self, name: &str) -> Option<bool> {
        self.lock()
            .pages
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.journal)
    }

    /// Count of blocks anywhere in the graph carrying the given `id` property.
    pub fn blocks_with_id(&self, id: &str) -> usize {
        let inner = self.lock();
        inner
            .pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .map(|b| count_with_id(b, id))
            .sum()
    }

    pub fn is_collapsed(&self, uuid: &str) -> bool {
        self.lock().collapsed.get(uuid).copied().unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("outline lock poisoned")
    }
}

impl Inner {
    fn new_block(&mut self, content: &str) -> Block {
        self.next_uuid += 1;
        Block {
            uuid: format!("block-{}", self.next_uuid),
            content: content.to_string(),
            children: Vec::new(),
            properties: parse_properties(content),
        }
    }
}

fn count_with_id(block: &Block, id: &str) -> usize {
    let own = usize::from(block.properties.get("id").map(String::as_str) == Some(id));
    own + block
        .children
        .iter()
        .map(|c| count_with_id(c, id))
        .sum::<usize>()
}

/// Parse `key:: value` property lines out of block content.
fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    for line in content.lines() {
        if let Some((key, value)) = line.split_once("::") {
            let key = key.trim();
            if !key.is_empty() && !key.contains(char::is_whitespace) {
                properties.insert(key.to_string(), value.trim().to_string());
            }
        }
    }
    properties
}

fn find_block_mut<'a>(blocks: &'a mut [Block], uuid: &str) -> Option<&'a mut Block> {
    for block in blocks {
        if block.uuid == uuid {
            return Some(block);
        }
        if let Some(found) = find_block_mut(&mut block.children, uuid) {
            return Some(found);
        }
    }
    None
}

fn find_by_id<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.properties.get("id").map(String::as_str) == Some(id) {
            return Some(block);
        }
        if let Some(found) = find_by_id(&block.children, id) {
            return Some(found);
        }
    }
    None
}

#[async_trait]
impl OutlineStore for MemoryOutline {
    async fn get_block_by_id(&self, id: &str) -> Result<Option<Block>, OutlineError> {
        let inner = self.lock();
        if inner.index_paused {
            return Ok(None);
        }
        Ok(inner
            .pages
            .iter()
            .find_map(|p| find_by_id(&p.blocks, id))
            .cloned())
    }

    async fn get_page(&self, name: &str) -> Result<Option<Page>, OutlineError> {
        Ok(self
            .lock()
            .pages
            .iter()
            .find(|p| p.name == name)
            .map(|p| Page {
                name: p.name.clone(),
            }))
    }

    async fn create_page(&self, name: &str, options: PageOptions) -> Result<(), OutlineError> {
        let mut inner = self.lock();
        if inner.pages.iter().any(|p| p.name == name) {
            return Ok(());
        }
        inner.pages.push(MemoryPage {
            name: name.to_string(),
            journal: options.journal,
            blocks: Vec::new(),
        });
        Ok(())
    }

    async fn page_blocks_tree(&self, name: &str) -> Result<Vec<Block>, OutlineError> {
        Ok(self
            .lock()
            .pages
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.blocks.clone())
            .unwrap_or_default())
    }

    async fn append_block_in_page(
        &self,
        name: &str,
        content: &str,
    ) -> Result<Block, OutlineError> {
        let mut inner = self.lock();
        let block = inner.new_block(content);
        let page = inner
            .pages
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| OutlineError::Api(format!("page not found: {name}")))?;
        page.blocks.push(block.clone());
        Ok(block)
    }

    async fn insert_block(&self, parent_uuid: &str, content: &str) -> Result<Block, OutlineError> {
        let mut inner = self.lock();
        let block = inner.new_block(content);
        let parent = inner
            .pages
            .iter_mut()
            .find_map(|p| find_block_mut(&mut p.blocks, parent_uuid))
            .ok_or_else(|| OutlineError::Api(format!("block not found: {parent_uuid}")))?;
        parent.children.push(block.clone());
        Ok(block)
    }

    async fn set_block_collapsed(&self, uuid: &str, collapsed: bool) -> Result<(), OutlineError> {
        self.lock().collapsed.insert(uuid.to_string(), collapsed);
        Ok(())
    }
}
