//! Storage Layer
//!
//! SQLite persistence for users and their sleep records, behind a
//! repository API.

mod models;
mod repository;

pub use models::{NewSleepRecord, SleepRecord, User};
pub use repository::Repository;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
}
