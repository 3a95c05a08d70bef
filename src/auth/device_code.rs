use chrono::{DateTime, Utc};

use super::Token;

/// Device-code session details for one login attempt.
///
/// Created by the authorization-start call, consumed by the polling loop,
/// and discarded when the loop terminates. `expires_at` is derived from the
/// server's `expires_in` at session start and bounds the total poll duration.
///
/// # Example
/// ```no_run
/// use codex_sync::auth::DeviceCodeSession;
/// use chrono::Utc;
///
/// let session = DeviceCodeSession {
///     verification_url: "http://localhost:8000/activate".to_string(),
///     verification_url_complete: "http://localhost:8000/activate?code=ABCD".to_string(),
///     user_code: "ABCD-EFGH".to_string(),
///     device_code: "device-auth-id".to_string(),
///     interval_secs: 5,
///     expires_at: Utc::now(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DeviceCodeSession {
    pub verification_url: String,
    pub verification_url_complete: String,
    pub user_code: String,
    pub device_code: String,
    pub interval_secs: u64,
    pub expires_at: DateTime<Utc>,
}

/// Polling outcome for a device-code session.
#[derive(Debug, Clone)]
pub enum DeviceCodePoll {
    Pending { interval_secs: u64 },
    SlowDown { interval_secs: u64 },
    Authorized { token: Token },
    AccessDenied,
    Expired,
}
