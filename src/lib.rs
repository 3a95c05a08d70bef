//! Codex saved-items synchronization client.
//!
//! Authenticates against the Codex service with the OAuth 2.0 Device
//! Authorization Grant, then pulls the user's saved items over GraphQL and
//! reconciles them into an outline-document graph, one journal page per
//! calendar date, without ever creating duplicate entries.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use codex_sync::auth::FileTokenStore;
//! use codex_sync::config::SyncConfig;
//! use codex_sync::outline::LogseqOutline;
//! use codex_sync::remote::CodexClient;
//! use codex_sync::sync::Synchronizer;
//!
//! # async fn example() -> codex_sync::error::Result<()> {
//! let config = SyncConfig::from_env();
//! let tokens = Arc::new(FileTokenStore::new(config.data_dir.clone()));
//! let outline = Arc::new(LogseqOutline::new(
//!     config.logseq_api_url.clone(),
//!     config.logseq_api_token.clone(),
//! ));
//! let client = CodexClient::new(config.graphql_url());
//! let sync = Synchronizer::new(client, tokens, outline, config.date_format.clone());
//! let outcome = sync.sync().await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod outline;
pub mod remote;
pub mod sync;
