use serde::{Deserialize, Serialize};

/// Token pair issued by the Codex service and held in a token store.
///
/// Absence of a stored token means "unauthenticated"; the pair is always
/// overwritten wholesale on a successful login.
///
/// # Example
/// ```no_run
/// use codex_sync::auth::Token;
///
/// let token = Token {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
}
