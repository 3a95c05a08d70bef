use crate::remote::{ItemKind, RemoteItem};

/// Content prefix marking the canonical parent block on each journal page.
pub const CONTAINER_MARKER: &str = "Codex";

/// Render an item's block text: title line, `id::` and `url::` property
/// lines, one variant-specific property line when present, then a trailing
/// blank line.
pub fn item_text(item: &RemoteItem) -> String {
    let mut text = format!("{}\n", item.title);
    text.push_str(&format!("id:: {}\nurl:: {}\n", item.id, item.source_url));
    if let ItemKind::RedditItem { subreddit } = &item.kind {
        text.push_str(&format!("subreddit:: #{subreddit}\n"));
    }
    text.push('\n');
    text
}

/// Render the nested image-reference block for an item thumbnail.
pub fn thumbnail_text(url: &str) -> String {
    format!("![]({url})")
}
