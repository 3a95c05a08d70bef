use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::codex::CodexAuth;
use super::device_code::{DeviceCodePoll, DeviceCodeSession};
use super::error::AuthError;
use super::store::TokenStore;
use super::token::Token;

/// Initial step returned by [`AuthService::start_login`].
#[derive(Debug, Clone)]
pub enum AuthStep {
    /// A token is already stored; login is an idempotent no-op.
    AlreadyAuthenticated,
    /// Device-code flow: show the URL and user code, then poll.
    DeviceCode {
        verification_url: String,
        user_code: String,
        interval: Duration,
        expires_at: DateTime<Utc>,
        session: DeviceCodeSession,
    },
}

/// Progress events emitted while [`AuthService::login`] drives the flow.
#[derive(Debug, Clone)]
pub enum LoginProgress {
    /// The session started; present these details to the operator.
    VerificationRequired {
        verification_url: String,
        verification_url_complete: String,
        user_code: String,
    },
    /// The user has not finished authorizing yet; still polling.
    AuthorizationPending,
    /// The token pair was obtained and persisted.
    Authorized,
}

/// Terminal result of a login attempt that did not error.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    AlreadyAuthenticated,
    Authorized { token: Token },
    Cancelled,
}

/// Callback receiving [`LoginProgress`] events.
pub type ProgressSink = Arc<dyn Fn(LoginProgress) + Send + Sync>;

/// Service facade for the device-code login flow.
///
/// All presentation (printing, opening a browser, exit codes) belongs to the
/// caller; the service only returns typed results and emits typed progress
/// events. At most one login attempt can be in flight at a time.
pub struct AuthService {
    auth: CodexAuth,
    store: Arc<dyn TokenStore>,
    login_gate: tokio::sync::Mutex<()>,
}

impl AuthService {
    pub fn new(auth: CodexAuth, store: Arc<dyn TokenStore>) -> Self {
        Self {
            auth,
            store,
            login_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Begin a login flow without driving it.
    ///
    /// Returns [`AuthStep::AlreadyAuthenticated`] when a token is stored, or
    /// the device-code details the caller must present before polling.
    pub async fn start_login(&self) -> Result<AuthStep, AuthError> {
        if self.store.load()?.is_some() {
            return Ok(AuthStep::AlreadyAuthenticated);
        }
        let session = self.auth.start_device_code().await?;
        Ok(AuthStep::DeviceCode {
            verification_url: session.verification_url.clone(),
            user_code: session.user_code.clone(),
            interval: Duration::from_secs(session.interval_secs),
            expires_at: session.expires_at,
            session,
        })
    }

    /// Poll a device-code session once.
    pub async fn poll_device_code(
        &self,
        session: &DeviceCodeSession,
    ) -> Result<DeviceCodePoll, AuthError> {
        self.auth.poll_device_code(session).await
    }

    /// Drive a complete login attempt to a terminal state.
    ///
    /// A second call while one attempt is outstanding fails immediately with
    /// [`AuthError::LoginInProgress`]. The poll interval is the one declared
    /// by the server (widened on `slow_down`), and the attempt ends with
    /// [`AuthError::Expired`] once the session deadline passes. A transport
    /// failure on a single tick is treated as "still pending" so transient
    /// network blips do not abort the attempt.
    pub async fn login(
        &self,
        cancel: CancellationToken,
        progress: ProgressSink,
    ) -> Result<LoginOutcome, AuthError> {
        let _guard = self
            .login_gate
            .try_lock()
            .map_err(|_| AuthError::LoginInProgress)?;

        if self.store.load()?.is_some() {
            return Ok(LoginOutcome::AlreadyAuthenticated);
        }

        let session = self.auth.start_device_code().await?;
        progress(LoginProgress::VerificationRequired {
            verification_url: session.verification_url.clone(),
            verification_url_complete: session.verification_url_complete.clone(),
            user_code: session.user_code.clone(),
        });

        let mut interval = Duration::from_secs(session.interval_secs);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(LoginOutcome::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }
            if Utc::now() >= session.expires_at {
                return Err(AuthError::Expired);
            }
            match self.auth.poll_device_code(&session).await {
                Ok(DeviceCodePoll::Pending { .. }) => {
                    progress(LoginProgress::AuthorizationPending);
                }
                Ok(DeviceCodePoll::SlowDown { interval_secs }) => {
                    debug!(interval_secs, "server requested slower polling");
                    interval = Duration::from_secs(interval_secs);
                    progress(LoginProgress::AuthorizationPending);
                }
                Ok(DeviceCodePoll::Authorized { token }) => {
                    progress(LoginProgress::Authorized);
                    return Ok(LoginOutcome::Authorized { token });
                }
                Ok(DeviceCodePoll::AccessDenied) => return Err(AuthError::AccessDenied),
                Ok(DeviceCodePoll::Expired) => return Err(AuthError::Expired),
                Err(AuthError::Network(err)) => {
                    // One failed tick is not loop termination.
                    warn!(error = %err, "poll tick failed, treating as pending");
                    progress(LoginProgress::AuthorizationPending);
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Spawn [`login`](Self::login) on the runtime, returning an owned,
    /// cancellable handle.
    pub fn spawn_login(self: &Arc<Self>, progress: ProgressSink) -> LoginHandle {
        let cancel = CancellationToken::new();
        let service = Arc::clone(self);
        let token = cancel.clone();
        let task = tokio::spawn(async move { service.login(token, progress).await });
        LoginHandle { cancel, task }
    }

    /// Return the stored token, if any.
    pub fn status(&self) -> Result<Option<Token>, AuthError> {
        self.store.load()
    }

    /// Remove the stored token.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()
    }
}

/// Owned handle for a spawned login attempt.
pub struct LoginHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<LoginOutcome, AuthError>>,
}

impl LoginHandle {
    /// Abort the pending attempt; [`wait`](Self::wait) then resolves to
    /// [`LoginOutcome::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the attempt to reach a terminal state.
    pub async fn wait(self) -> Result<LoginOutcome, AuthError> {
        self.task
            .await
            .map_err(|err| AuthError::Io(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::FileTokenStore;
    use tempfile::TempDir;

    fn temp_service() -> (TempDir, AuthService, Arc<FileTokenStore>) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileTokenStore::new(dir.path().to_path_buf()));
        let auth = CodexAuth::new("http://127.0.0.1:9", "logseq", store.clone());
        let svc = AuthService::new(auth, store.clone());
        (dir, svc, store)
    }

    fn sample_token() -> Token {
        Token {
            access_token: "test-access-token".to_string(),
            refresh_token: "test-refresh".to_string(),
        }
    }

    #[test]
    fn status_returns_none_when_not_logged_in() {
        let (_dir, svc, _store) = temp_service();
        assert!(svc.status().unwrap().is_none());
    }

    #[test]
    fn status_returns_token_after_store_save() {
        let (_dir, svc, store) = temp_service();
        store.save(&sample_token()).unwrap();
        let result = svc.status().unwrap();
        assert_eq!(result.unwrap().access_token, "test-access-token");
    }

    #[test]
    fn logout_clears_stored_token() {
        let (_dir, svc, store) = temp_service();
        store.save(&sample_token()).unwrap();
        svc.logout().unwrap();
        assert!(svc.status().unwrap().is_none());
    }

    #[test]
    fn logout_succeeds_when_already_logged_out() {
        let (_dir, svc, _store) = temp_service();
        svc.logout().unwrap();
    }

    #[tokio::test]
    async fn start_login_short_circuits_when_token_stored() {
        let (_dir, svc, store) = temp_service();
        store.save(&sample_token()).unwrap();
        let step = svc.start_login().await.unwrap();
        assert!(matches!(step, AuthStep::AlreadyAuthenticated));
    }

    #[tokio::test]
    async fn login_is_a_no_op_when_token_stored() {
        let (_dir, svc, store) = temp_service();
        store.save(&sample_token()).unwrap();
        let outcome = svc
            .login(CancellationToken::new(), Arc::new(|_| {}))
            .await
            .unwrap();
        assert!(matches!(outcome, LoginOutcome::AlreadyAuthenticated));
    }
}
