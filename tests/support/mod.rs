#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use codex_sync::auth::{AuthError, Token, TokenStore};
use serde_json::{json, Value};

/// Single-slot in-memory token store with a save counter.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<Token>>,
    saves: AtomicUsize,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, token: Token) {
        *self.token.lock().expect("store lock poisoned") = Some(token);
    }

    pub fn get(&self) -> Option<Token> {
        self.token.lock().expect("store lock poisoned").clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().expect("store lock poisoned") = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

pub fn token(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: "refresh".to_string(),
    }
}

/// Wire-shaped saved item for GraphQL response bodies.
pub fn item_json(id: &str, title: &str, created_at: &str, thumbnail: &str) -> Value {
    json!({
        "__typename": "RedditItem",
        "id": id,
        "title": title,
        "sourceUrl": format!("http://example.com/{id}"),
        "createdAt": created_at,
        "thumbnailUrl": thumbnail,
        "subreddit": "rust"
    })
}

pub fn items_response(items: Vec<Value>) -> Value {
    json!({ "data": { "myItems": items } })
}
