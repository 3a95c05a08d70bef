use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Deserialize;

use super::device_code::{DeviceCodePoll, DeviceCodeSession};
use super::error::AuthError;
use super::store::TokenStore;
use super::token::Token;

pub const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Codex OAuth helper implementing the device-code grant.
///
/// Owns the HTTP client and the endpoint URLs; the URLs have builder
/// overrides so tests can point them at a mock server.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use codex_sync::auth::{CodexAuth, FileTokenStore};
///
/// let store = Arc::new(FileTokenStore::new_default());
/// let auth = CodexAuth::new("http://localhost:8000", "logseq", store);
/// ```
pub struct CodexAuth {
    client: reqwest::Client,
    client_id: String,
    device_authorization_url: String,
    token_url: String,
    token_store: Arc<dyn TokenStore>,
}

impl CodexAuth {
    pub fn new(
        base_url: impl AsRef<str>,
        client_id: impl Into<String>,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            device_authorization_url: format!("{base}/device_authorization"),
            token_url: format!("{base}/token"),
            token_store,
        }
    }

    pub fn with_device_authorization_url(mut self, url: impl Into<String>) -> Self {
        self.device_authorization_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Begin a device-authorization session.
    ///
    /// One request, no retry: a transport failure or malformed body abandons
    /// the attempt before any polling starts.
    pub async fn start_device_code(&self) -> Result<DeviceCodeSession, AuthError> {
        let resp = self
            .client
            .post(&self.device_authorization_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", GRANT_TYPE),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "Device authorization request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceAuthorizationResponse = resp.json().await?;
        let expires_at = Utc::now() + Duration::seconds(payload.expires_in as i64);
        Ok(DeviceCodeSession {
            verification_url: payload.verification_uri,
            verification_url_complete: payload.verification_uri_complete,
            user_code: payload.user_code,
            device_code: payload.device_code,
            interval_secs: payload.interval,
            expires_at,
        })
    }

    /// Poll the token endpoint once for the given session.
    ///
    /// A successful poll persists the token pair through the store before
    /// returning `Authorized`. An `error` body means the user has not
    /// finished authorizing and polling should continue; only the reserved
    /// `access_denied` and `expired_token` values are terminal.
    pub async fn poll_device_code(
        &self,
        session: &DeviceCodeSession,
    ) -> Result<DeviceCodePoll, AuthError> {
        if Utc::now() >= session.expires_at {
            return Ok(DeviceCodePoll::Expired);
        }
        let resp = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", GRANT_TYPE),
                ("device_code", session.device_code.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "Token request failed with status {}",
                resp.status()
            )));
        }
        let payload: TokenEndpointResponse = resp.json().await?;
        if let (Some(access_token), Some(refresh_token)) =
            (payload.access_token, payload.refresh_token)
        {
            let token = Token {
                access_token,
                refresh_token,
            };
            self.token_store.save(&token)?;
            return Ok(DeviceCodePoll::Authorized { token });
        }
        match payload.error.as_deref() {
            Some("slow_down") => Ok(DeviceCodePoll::SlowDown {
                interval_secs: session.interval_secs + 2,
            }),
            Some("expired_token") => Ok(DeviceCodePoll::Expired),
            Some("access_denied") => Ok(DeviceCodePoll::AccessDenied),
            Some(_) => Ok(DeviceCodePoll::Pending {
                interval_secs: session.interval_secs,
            }),
            None => Err(AuthError::InvalidResponse(
                "Token response missing both token pair and error".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceAuthorizationResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    verification_uri_complete: String,
    expires_in: u64,
    interval: u64,
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
}
