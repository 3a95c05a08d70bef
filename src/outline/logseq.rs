use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Block, OutlineError, OutlineStore, Page, PageOptions};

/// Adapter for the Logseq desktop local HTTP API.
///
/// Every call is `POST {api_url}/api` with a `{"method", "args"}` envelope,
/// authorized with the API token configured in Logseq's settings.
///
/// # Example
/// ```no_run
/// use codex_sync::outline::LogseqOutline;
///
/// let outline = LogseqOutline::new(
///     "http://127.0.0.1:12315".to_string(),
///     Some("api-token".to_string()),
/// );
/// ```
pub struct LogseqOutline {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl LogseqOutline {
    pub fn new(api_url: String, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api", api_url.trim_end_matches('/')),
            api_token,
        }
    }

    async fn call(&self, method: &str, args: Value) -> Result<Value, OutlineError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "method": method, "args": args }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(OutlineError::Api(format!(
                "{method} failed with status {}",
                resp.status()
            )));
        }
        Ok(resp.json().await?)
    }

    fn parse_block(value: Value) -> Result<Option<Block>, OutlineError> {
        if value.is_null() {
            return Ok(None);
        }
        let raw: RawBlock = serde_json::from_value(value)
            .map_err(|err| OutlineError::InvalidResponse(err.to_string()))?;
        Ok(Some(raw.into()))
    }
}

#[async_trait]
impl OutlineStore for LogseqOutline {
    async fn get_block_by_id(&self, id: &str) -> Result<Option<Block>, OutlineError> {
        let value = self.call("logseq.Editor.getBlock", json!([id])).await?;
        Self::parse_block(value)
    }

    async fn get_page(&self, name: &str) -> Result<Option<Page>, OutlineError> {
        let value = self.call("logseq.Editor.getPage", json!([name])).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(Page {
            name: name.to_string(),
        }))
    }

    async fn create_page(&self, name: &str, options: PageOptions) -> Result<(), OutlineError> {
        self.call(
            "logseq.Editor.createPage",
            json!([
                name,
                {},
                {
                    "createFirstBlock": false,
                    "journal": options.journal,
                    "redirect": options.redirect,
                }
            ]),
        )
        .await?;
        Ok(())
    }

    async fn page_blocks_tree(&self, name: &str) -> Result<Vec<Block>, OutlineError> {
        let value = self
            .call("logseq.Editor.getPageBlocksTree", json!([name]))
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let raw: Vec<RawBlock> = serde_json::from_value(value)
            .map_err(|err| OutlineError::InvalidResponse(err.to_string()))?;
        Ok(raw.into_iter().map(Block::from).collect())
    }

    async fn append_block_in_page(
        &self,
        name: &str,
        content: &str,
    ) -> Result<Block, OutlineError> {
        let value = self
            .call("logseq.Editor.appendBlockInPage", json!([name, content]))
            .await?;
        Self::parse_block(value)?
            .ok_or_else(|| OutlineError::InvalidResponse("appendBlockInPage returned null".into()))
    }

    async fn insert_block(&self, parent_uuid: &str, content: &str) -> Result<Block, OutlineError> {
        let value = self
            .call(
                "logseq.Editor.insertBlock",
                json!([parent_uuid, content, { "sibling": false }]),
            )
            .await?;
        Self::parse_block(value)?
            .ok_or_else(|| OutlineError::InvalidResponse("insertBlock returned null".into()))
    }

    async fn set_block_collapsed(&self, uuid: &str, collapsed: bool) -> Result<(), OutlineError> {
        self.call(
            "logseq.Editor.setBlockCollapsed",
            json!([uuid, { "flag": collapsed }]),
        )
        .await?;
        Ok(())
    }
}

/// Block shape as the Logseq API returns it.
#[derive(Debug, Deserialize)]
struct RawBlock {
    uuid: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    children: Vec<RawBlock>,
    #[serde(default)]
    properties: HashMap<String, Value>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            uuid: raw.uuid,
            content: raw.content,
            children: raw.children.into_iter().map(Block::from).collect(),
            properties: raw
                .properties
                .into_iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (key, text)
                })
                .collect(),
        }
    }
}
