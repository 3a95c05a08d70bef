use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::Token;

/// Storage abstraction for the persisted token pair.
///
/// The client is single-account by design, so the store holds exactly one
/// named slot: a save overwrites whatever was there before.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Token>, AuthError>;
    fn save(&self, token: &Token) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

const TOKEN_FILE_NAME: &str = "codex.toml";

/// File-backed token store using a single TOML file.
///
/// # Example
/// ```no_run
/// use codex_sync::auth::{FileTokenStore, Token, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// let token = Token {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
/// };
/// store.save(&token)?;
/// # Ok::<(), codex_sync::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    base_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_data_dir(),
        }
    }

    fn token_path(&self) -> PathBuf {
        self.base_dir.join(TOKEN_FILE_NAME)
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        let path = self.token_path();
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: TokenFile = toml::from_str(&raw)?;
        Ok(Some(file.token))
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        let path = self.token_path();
        Self::ensure_parent(&path)?;
        let file = TokenFile {
            version: 1,
            token: token.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let path = self.token_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    token: Token,
    saved_at: DateTime<Utc>,
}

pub(crate) fn default_data_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".codex-sync"))
        .unwrap_or_else(|| PathBuf::from(".codex-sync"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileTokenStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn sample_token() -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    #[test]
    fn token_round_trip_works() {
        let (_dir, store) = temp_store();
        store.save(&sample_token()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access");
        assert_eq!(loaded.refresh_token, "refresh");
    }

    #[test]
    fn load_returns_none_when_missing() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_token() {
        let (_dir, store) = temp_store();
        store.save(&sample_token()).unwrap();
        let replacement = Token {
            access_token: "access-2".to_string(),
            refresh_token: "refresh-2".to_string(),
        };
        store.save(&replacement).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access-2");
    }

    #[test]
    fn clear_removes_token() {
        let (_dir, store) = temp_store();
        store.save(&sample_token()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_succeeds_when_already_empty() {
        let (_dir, store) = temp_store();
        store.clear().unwrap();
    }
}
