//! Request Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use storage::StorageError;
use thiserror::Error;
use tracing::{error, warn};

use crate::templates;

/// Errors a handler can fail with
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("CSRF verification failed")]
    CsrfMismatch,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::CsrfMismatch => {
                warn!("Rejected request: {}", self);
                (StatusCode::FORBIDDEN, templates::forbidden_page()).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, templates::error_page()).into_response()
            }
        }
    }
}
