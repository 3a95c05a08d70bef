//! Error types for codex-sync.

use thiserror::Error;

use crate::auth::AuthError;
use crate::outline::OutlineError;
use crate::remote::RemoteError;

/// Primary error type for library operations.
#[derive(Error, Debug)]
pub enum SyncClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Remote query error: {0}")]
    Remote(String),

    #[error("Outline store error: {0}")]
    Outline(String),
}

impl From<AuthError> for SyncClientError {
    fn from(error: AuthError) -> Self {
        Self::Authentication(error.to_string())
    }
}

impl From<RemoteError> for SyncClientError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Unauthorized => Self::Authentication(error.to_string()),
            other => Self::Remote(other.to_string()),
        }
    }
}

impl From<OutlineError> for SyncClientError {
    fn from(error: OutlineError) -> Self {
        Self::Outline(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SyncClientError>;
