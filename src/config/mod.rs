//! Layered configuration (defaults > config file > environment).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dates::DEFAULT_DATE_FORMAT;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CLIENT_ID: &str = "logseq";
const DEFAULT_LOGSEQ_API_URL: &str = "http://127.0.0.1:12315";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Runtime configuration for the sync client.
///
/// Resolution order: built-in defaults, then `config.toml` under the data
/// dir, then `CODEX_SYNC_*` / `LOGSEQ_API_*` environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the Codex service.
    pub base_url: String,
    /// OAuth client identifier presented to the device-authorization flow.
    pub client_id: String,
    /// Preferred date format driving journal page keys.
    pub date_format: String,
    /// Directory holding the token slot and the config file.
    pub data_dir: PathBuf,
    /// Logseq local HTTP API endpoint.
    pub logseq_api_url: String,
    /// Logseq local HTTP API token, when the server requires one.
    pub logseq_api_token: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            data_dir: crate::auth::store::default_data_dir(),
            logseq_api_url: DEFAULT_LOGSEQ_API_URL.to_string(),
            logseq_api_token: None,
        }
    }
}

impl SyncConfig {
    /// Load configuration from the default data dir and the environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        config.apply_file(&config.data_dir.join(CONFIG_FILE_NAME));
        config.apply_env();
        config
    }

    /// Load configuration rooted at a specific data dir (used by tests).
    pub fn from_dir(data_dir: PathBuf) -> Self {
        let mut config = Self {
            data_dir,
            ..Self::default()
        };
        config.apply_file(&config.data_dir.join(CONFIG_FILE_NAME));
        config
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url.trim_end_matches('/'))
    }

    fn apply_file(&mut self, path: &Path) {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return,
        };
        let file: FileConfig = match toml::from_str(&raw) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring malformed config file");
                return;
            }
        };
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(client_id) = file.client_id {
            self.client_id = client_id;
        }
        if let Some(date_format) = file.date_format {
            self.date_format = date_format;
        }
        if let Some(logseq_api_url) = file.logseq_api_url {
            self.logseq_api_url = logseq_api_url;
        }
        if file.logseq_api_token.is_some() {
            self.logseq_api_token = file.logseq_api_token;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("CODEX_SYNC_BASE_URL") {
            self.base_url = value;
        }
        if let Ok(value) = std::env::var("CODEX_SYNC_CLIENT_ID") {
            self.client_id = value;
        }
        if let Ok(value) = std::env::var("CODEX_SYNC_DATE_FORMAT") {
            self.date_format = value;
        }
        if let Ok(value) = std::env::var("LOGSEQ_API_URL") {
            self.logseq_api_url = value;
        }
        if let Ok(token) = std::env::var("LOGSEQ_API_TOKEN") {
            self.logseq_api_token = Some(token);
        }
        if let Ok(dir) = std::env::var("CODEX_SYNC_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    client_id: Option<String>,
    date_format: Option<String>,
    logseq_api_url: Option<String>,
    logseq_api_token: Option<String>,
}
