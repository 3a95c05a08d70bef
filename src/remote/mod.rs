//! Saved-items query client for the Codex GraphQL endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Query document for the authenticated user's saved items.
const ITEMS_QUERY: &str = "\
query FetchMyItems {
  myItems(first: 1000) {
    __typename

    id
    title
    sourceUrl
    createdAt
    thumbnailUrl

    ... on RedditItem {
      subreddit
    }
  }
}
";

/// Errors reported by the item query endpoint.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Not authenticated (token missing, stale, or revoked)")]
    Unauthorized,
    #[error("Remote query failed: {0}")]
    Remote(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

/// One saved item as returned by the query endpoint.
///
/// Read-only from this client's perspective; the remote service is the
/// source of truth and `id` is stable across syncs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    pub id: String,
    pub title: String,
    pub source_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl RemoteItem {
    /// Thumbnail URL, with the wire format's empty string meaning "none".
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Kind-specific item fields, discriminated by the GraphQL `__typename`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum ItemKind {
    RedditItem { subreddit: String },
    #[serde(other)]
    Other,
}

/// HTTP client for the item query endpoint.
///
/// # Example
/// ```no_run
/// use codex_sync::remote::CodexClient;
///
/// # async fn example() -> Result<(), codex_sync::remote::RemoteError> {
/// let client = CodexClient::new("http://localhost:8000/graphql");
/// let items = client.fetch_items("access-token").await?;
/// # Ok(())
/// # }
/// ```
pub struct CodexClient {
    client: reqwest::Client,
    graphql_url: String,
}

impl CodexClient {
    pub fn new(graphql_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            graphql_url: graphql_url.into(),
        }
    }

    /// Fetch the authenticated user's saved items, in server order.
    pub async fn fetch_items(&self, access_token: &str) -> Result<Vec<RemoteItem>, RemoteError> {
        let resp = self
            .client
            .post(&self.graphql_url)
            .header("Authorization", format!("Bearer {access_token}"))
            .json(&serde_json::json!({ "query": ITEMS_QUERY }))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RemoteError::Unauthorized);
        }
        if !status.is_success() {
            return Err(RemoteError::Remote(format!(
                "Item query failed with status {status}"
            )));
        }

        let payload: GraphQlResponse = resp.json().await?;
        if let Some(errors) = payload.errors {
            if errors.iter().any(|err| is_auth_message(&err.message)) {
                return Err(RemoteError::Unauthorized);
            }
            let messages: Vec<_> = errors.into_iter().map(|err| err.message).collect();
            return Err(RemoteError::Remote(messages.join("; ")));
        }
        payload
            .data
            .map(|data| data.my_items)
            .ok_or_else(|| RemoteError::InvalidResponse("Response missing data".to_string()))
    }
}

fn is_auth_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("unauthenticated") || lower.contains("unauthorized")
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ItemsData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct ItemsData {
    #[serde(rename = "myItems")]
    my_items: Vec<RemoteItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_deserializes_reddit_variant() {
        let item: RemoteItem = serde_json::from_value(json!({
            "__typename": "RedditItem",
            "id": "x1",
            "title": "Post",
            "sourceUrl": "http://e.g",
            "createdAt": "2024-01-02T00:00:00Z",
            "thumbnailUrl": "",
            "subreddit": "rust"
        }))
        .unwrap();
        assert!(matches!(item.kind, ItemKind::RedditItem { ref subreddit } if subreddit == "rust"));
        assert_eq!(item.thumbnail(), None);
    }

    #[test]
    fn item_deserializes_unknown_typename_as_other() {
        let item: RemoteItem = serde_json::from_value(json!({
            "__typename": "HackerNewsItem",
            "id": "y1",
            "title": "Story",
            "sourceUrl": "http://example.com",
            "createdAt": "2024-03-05T12:30:00Z",
            "thumbnailUrl": "http://example.com/t.png"
        }))
        .unwrap();
        assert!(matches!(item.kind, ItemKind::Other));
        assert_eq!(item.thumbnail(), Some("http://example.com/t.png"));
    }

    #[test]
    fn missing_thumbnail_field_is_none() {
        let item: RemoteItem = serde_json::from_value(json!({
            "__typename": "RedditItem",
            "id": "z1",
            "title": "No thumb",
            "sourceUrl": "http://e.g",
            "createdAt": "2024-01-02T00:00:00Z",
            "subreddit": "rust"
        }))
        .unwrap();
        assert_eq!(item.thumbnail(), None);
    }

    #[test]
    fn auth_message_detection_is_case_insensitive() {
        assert!(is_auth_message("Unauthenticated request"));
        assert!(is_auth_message("UNAUTHORIZED"));
        assert!(!is_auth_message("internal server error"));
    }
}
