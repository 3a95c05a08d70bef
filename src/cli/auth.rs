//! CLI handlers for login, status, and logout.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::{
    AuthError, AuthService, CodexAuth, FileTokenStore, LoginOutcome, LoginProgress,
};
use crate::config::SyncConfig;
use crate::error::Result;

fn service(config: &SyncConfig) -> AuthService {
    let store = Arc::new(FileTokenStore::new(config.data_dir.clone()));
    let auth = CodexAuth::new(&config.base_url, &config.client_id, store.clone());
    AuthService::new(auth, store)
}

/// Handle `codex-sync login`.
pub async fn handle_login(config: &SyncConfig) -> Result<()> {
    let svc = service(config);

    let progress = Arc::new(|event: LoginProgress| match event {
        LoginProgress::VerificationRequired {
            verification_url,
            verification_url_complete,
            user_code,
        } => {
            println!("🔗 Visit: {verification_url}");
            println!("📋 Enter code: {user_code}");
            println!("⏳ Waiting for authorization...");
            // Best-effort convenience; a failure to open a browser is ignored.
            let _ = webbrowser::open(&verification_url_complete);
        }
        LoginProgress::AuthorizationPending => {
            println!("⏳ Still waiting for you to authorize this device...");
        }
        LoginProgress::Authorized => {}
    });

    match svc.login(CancellationToken::new(), progress).await {
        Ok(LoginOutcome::AlreadyAuthenticated) => {
            println!("✅ Already authenticated");
            Ok(())
        }
        Ok(LoginOutcome::Authorized { .. }) => {
            println!("✅ You have successfully authorized this device");
            Ok(())
        }
        Ok(LoginOutcome::Cancelled) => {
            eprintln!("❌ Login cancelled");
            std::process::exit(1);
        }
        Err(AuthError::AccessDenied) => {
            eprintln!("❌ Authorization denied");
            std::process::exit(1);
        }
        Err(AuthError::Expired) => {
            eprintln!("❌ Device code expired, please try again");
            std::process::exit(1);
        }
        Err(AuthError::Network(_) | AuthError::InvalidResponse(_)) => {
            eprintln!("❌ Failed to contact the server, please try again later");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

/// Handle `codex-sync status`.
pub async fn handle_status(config: &SyncConfig) -> Result<()> {
    let svc = service(config);
    match svc.status()? {
        Some(_) => println!("✅ Logged in"),
        None => println!("❌ Not logged in"),
    }
    Ok(())
}

/// Handle `codex-sync logout`.
pub async fn handle_logout(config: &SyncConfig) -> Result<()> {
    let svc = service(config);
    svc.logout()?;
    println!("✅ Logged out");
    Ok(())
}
