//! Repository Implementation

use crate::models::{NewSleepRecord, SleepRecord, User};
use crate::StorageError;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// Repository for users and sleep records, backed by SQLite
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Open (or create) the database at `url` and apply migrations
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        info!("Opening SQLite repository at {}", url);
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database (one connection, never recycled)
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // Every connection to `:memory:` is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!("Migrations applied");
        Ok(Self { pool })
    }

    /// Underlying pool, shared with the session store
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new account
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, StorageError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                info!("Created user {} ({})", user.id, user.username);
                Ok(user)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StorageError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up an account by id
    pub async fn find_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Look up an account by username, ignoring case
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Whether an account with this username exists, ignoring case
    pub async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Delete an account; its records go with it
    pub async fn delete_user(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist a validated record for `user_id`
    pub async fn insert_record(
        &self,
        user_id: i64,
        record: &NewSleepRecord,
    ) -> Result<SleepRecord, StorageError> {
        let record = sqlx::query_as::<_, SleepRecord>(
            "INSERT INTO sleep_records (user_id, sleep_time, wake_time, notes) VALUES (?, ?, ?, ?) \
             RETURNING id, user_id, sleep_time, wake_time, notes",
        )
        .bind(user_id)
        .bind(record.sleep_time)
        .bind(record.wake_time)
        .bind(record.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted sleep record {} for user {}", record.id, user_id);
        Ok(record)
    }

    /// Records owned by `user_id`, newest sleep first.
    ///
    /// With `date`, only records whose `sleep_time` falls on that day.
    pub async fn list_records(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<SleepRecord>, StorageError> {
        Ok(sqlx::query_as::<_, SleepRecord>(
            "SELECT id, user_id, sleep_time, wake_time, notes FROM sleep_records \
             WHERE user_id = ?1 AND (?2 IS NULL OR date(sleep_time) = ?2) \
             ORDER BY sleep_time DESC, id DESC",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Number of records owned by `user_id`
    pub async fn record_count(&self, user_id: i64) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sleep_records WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
