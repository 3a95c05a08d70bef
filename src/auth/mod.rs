//! OAuth device-code flow and token storage for the Codex service.

pub mod codex;
pub mod device_code;
pub mod error;
pub mod service;
pub mod store;
pub mod token;

pub use codex::CodexAuth;
pub use device_code::{DeviceCodePoll, DeviceCodeSession};
pub use error::AuthError;
pub use service::{AuthService, AuthStep, LoginHandle, LoginOutcome, LoginProgress, ProgressSink};
pub use store::{FileTokenStore, TokenStore};
pub use token::Token;
