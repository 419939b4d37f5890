//! Record Types

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account row
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted sleep record, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SleepRecord {
    pub id: i64,
    pub user_id: i64,
    pub sleep_time: NaiveDateTime,
    pub wake_time: NaiveDateTime,
    pub notes: Option<String>,
}

impl SleepRecord {
    /// Time between falling asleep and waking up
    pub fn duration(&self) -> TimeDelta {
        self.wake_time - self.sleep_time
    }

    /// Duration rendered as `"{h}h {m}m"`
    pub fn duration_display(&self) -> String {
        format_duration(self.duration())
    }
}

/// A validated record that has no owner yet.
///
/// The owner is supplied to [`crate::Repository::insert_record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSleepRecord {
    pub sleep_time: NaiveDateTime,
    pub wake_time: NaiveDateTime,
    pub notes: Option<String>,
}

impl NewSleepRecord {
    pub fn duration(&self) -> TimeDelta {
        self.wake_time - self.sleep_time
    }
}

fn format_duration(delta: TimeDelta) -> String {
    let total_seconds = delta.num_seconds();
    let hours = total_seconds.div_euclid(3600);
    let minutes = total_seconds.rem_euclid(3600) / 60;
    format!("{}h {}m", hours, minutes)
}
