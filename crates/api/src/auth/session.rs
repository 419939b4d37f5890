//! Session-backed login state.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use storage::User;
use tower_sessions::Session;
use tracing::debug;

use crate::error::AppError;
use crate::AppState;

/// Key for storing the user id in the session
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Where anonymous visitors are sent
pub const LOGIN_URL: &str = "/accounts/login/";

/// The authenticated user behind a request.
///
/// Rejects anonymous requests with a redirect to the login page that
/// remembers the original path.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let user_id: Option<i64> = session
            .get(SESSION_USER_ID_KEY)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        let user = match user_id {
            Some(id) => state
                .repository
                .find_user(id)
                .await
                .map_err(|e| AppError::from(e).into_response())?,
            None => None,
        };

        match user {
            Some(user) => Ok(user.into()),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                debug!("Anonymous request to {}, redirecting to login", next);
                Err(Redirect::to(&login_redirect(next)).into_response())
            }
        }
    }
}

/// Login URL carrying `next`
pub fn login_redirect(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("{}?{}", LOGIN_URL, query),
        Err(_) => LOGIN_URL.to_string(),
    }
}

/// Bind `user` to the session under a fresh session id
pub async fn login(session: &Session, user: &User) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    Ok(())
}

/// Drop all session data, including the CSRF token
pub async fn logout(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}
