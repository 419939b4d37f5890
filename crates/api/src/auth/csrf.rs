//! Per-session CSRF tokens for every POST form.

use serde::Deserialize;
use subtle::ConstantTimeEq;
use tower_sessions::Session;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

/// Session key holding the token
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Form field carrying the token
pub const CSRF_FIELD: &str = "csrf_token";

/// A submitted form together with its CSRF token
#[derive(Debug, Deserialize)]
pub struct CsrfForm<T> {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(flatten)]
    pub form: T,
}

/// The session's token, created on first use
pub async fn csrf_token(session: &Session) -> Result<String, AppError> {
    if let Some(token) = session.get::<String>(CSRF_TOKEN_KEY).await? {
        return Ok(token);
    }
    let token = Uuid::new_v4().simple().to_string();
    session.insert(CSRF_TOKEN_KEY, &token).await?;
    Ok(token)
}

/// Fails with [`AppError::CsrfMismatch`] unless `submitted` matches the
/// session's token
pub async fn verify_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    let expected = session.get::<String>(CSRF_TOKEN_KEY).await?;
    match expected {
        Some(expected)
            if !submitted.is_empty()
                && bool::from(expected.as_bytes().ct_eq(submitted.as_bytes())) =>
        {
            Ok(())
        }
        Some(_) => {
            warn!("CSRF token mismatch");
            Err(AppError::CsrfMismatch)
        }
        None => {
            warn!("CSRF check on a session without a token");
            Err(AppError::CsrfMismatch)
        }
    }
}
