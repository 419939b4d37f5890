//! Sleep Record Form

use crate::error::{FormError, FormErrors};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use storage::NewSleepRecord;
use tracing::debug;

/// Accepted timestamp layouts; the first is what `datetime-local` inputs send
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Allowed sleep duration, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLimits {
    pub min_duration: TimeDelta,
    pub max_duration: TimeDelta,
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self {
            min_duration: TimeDelta::minutes(5),
            max_duration: TimeDelta::hours(24),
        }
    }
}

/// Raw input from the add-record form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepRecordForm {
    pub sleep_time: String,
    pub wake_time: String,
    pub notes: String,
}

impl SleepRecordForm {
    /// Validate with the default limits
    pub fn validate(&self) -> Result<NewSleepRecord, FormErrors> {
        self.validate_with(&RecordLimits::default())
    }

    /// Validate the whole form. The returned record has no owner.
    pub fn validate_with(&self, limits: &RecordLimits) -> Result<NewSleepRecord, FormErrors> {
        let mut errors = FormErrors::new();
        let sleep_time = required_datetime(&mut errors, "sleep_time", &self.sleep_time);
        let wake_time = required_datetime(&mut errors, "wake_time", &self.wake_time);

        let (Some(sleep_time), Some(wake_time)) = (sleep_time, wake_time) else {
            return Err(errors);
        };

        if let Err(e) = check_interval(sleep_time, wake_time, limits) {
            debug!("Rejected sleep interval {} -> {}: {}", sleep_time, wake_time, e);
            errors.add_non_field(e);
        }

        let notes = match self.notes.trim() {
            "" => None,
            notes => Some(notes.to_string()),
        };

        errors.into_result(|| NewSleepRecord {
            sleep_time,
            wake_time,
            notes,
        })
    }
}

/// Parse a form timestamp
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn required_datetime(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
) -> Option<NaiveDateTime> {
    if value.trim().is_empty() {
        errors.add_field(field, FormError::Required);
        return None;
    }
    let parsed = parse_datetime(value);
    if parsed.is_none() {
        errors.add_field(field, FormError::InvalidDateTime);
    }
    parsed
}

fn check_interval(
    sleep_time: NaiveDateTime,
    wake_time: NaiveDateTime,
    limits: &RecordLimits,
) -> Result<(), FormError> {
    if wake_time <= sleep_time {
        return Err(FormError::WakeNotAfterSleep);
    }
    let duration = wake_time - sleep_time;
    if duration < limits.min_duration {
        return Err(FormError::TooShort {
            min_minutes: limits.min_duration.num_minutes(),
        });
    }
    if duration > limits.max_duration {
        return Err(FormError::TooLong {
            max_hours: limits.max_duration.num_hours(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn form(sleep_time: &str, wake_time: &str, notes: &str) -> SleepRecordForm {
        SleepRecordForm {
            sleep_time: sleep_time.to_string(),
            wake_time: wake_time.to_string(),
            notes: notes.to_string(),
        }
    }

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap()
    }

    fn form_for(sleep_time: NaiveDateTime, wake_time: NaiveDateTime) -> SleepRecordForm {
        let format = "%Y-%m-%dT%H:%M:%S";
        form(
            &sleep_time.format(format).to_string(),
            &wake_time.format(format).to_string(),
            "",
        )
    }

    #[test]
    fn test_overnight_record_accepted() {
        let record = form("2024-01-01T23:00", "2024-01-02T06:30", "  slept well ")
            .validate()
            .unwrap();
        assert_eq!(record.duration(), TimeDelta::minutes(450));
        assert_eq!(record.notes.as_deref(), Some("slept well"));
    }

    #[test]
    fn test_blank_notes_become_none() {
        let record = form("2024-01-01 23:00", "2024-01-02 06:30:00", "   ")
            .validate()
            .unwrap();
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_missing_and_malformed_fields() {
        let errors = form("", "yesterday", "").validate().unwrap_err();
        assert_eq!(errors.field("sleep_time"), &[FormError::Required]);
        assert_eq!(errors.field("wake_time"), &[FormError::InvalidDateTime]);
        assert!(errors.non_field().is_empty());
    }

    #[test]
    fn test_wake_equal_to_sleep_rejected() {
        let errors = form("2024-01-01T23:00", "2024-01-01T23:00", "")
            .validate()
            .unwrap_err();
        assert_eq!(errors.non_field(), &[FormError::WakeNotAfterSleep]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(form("2024-01-01T23:00", "2024-01-01T23:05", "").validate().is_ok());
        assert!(form("2024-01-01T23:00", "2024-01-02T23:00", "").validate().is_ok());

        let short = form("2024-01-01T23:00", "2024-01-01T23:04", "").validate().unwrap_err();
        assert_eq!(short.non_field(), &[FormError::TooShort { min_minutes: 5 }]);

        let long = form("2024-01-01T23:00", "2024-01-02T23:01", "").validate().unwrap_err();
        assert_eq!(long.non_field(), &[FormError::TooLong { max_hours: 24 }]);
    }

    #[test]
    fn test_custom_limits() {
        let limits = RecordLimits {
            min_duration: TimeDelta::hours(1),
            max_duration: TimeDelta::hours(12),
        };
        let errors = form("2024-01-01T23:00", "2024-01-01T23:30", "")
            .validate_with(&limits)
            .unwrap_err();
        assert_eq!(errors.non_field(), &[FormError::TooShort { min_minutes: 60 }]);
    }

    proptest! {
        #[test]
        fn prop_wake_not_after_sleep_rejected(back in 0i64..7 * 24 * 3600) {
            let sleep_time = base();
            let wake_time = sleep_time - TimeDelta::seconds(back);
            let errors = form_for(sleep_time, wake_time).validate().unwrap_err();
            prop_assert_eq!(errors.non_field(), &[FormError::WakeNotAfterSleep]);
        }

        #[test]
        fn prop_too_short_rejected(secs in 1i64..5 * 60) {
            let sleep_time = base();
            let wake_time = sleep_time + TimeDelta::seconds(secs);
            prop_assert!(form_for(sleep_time, wake_time).validate().is_err());
        }

        #[test]
        fn prop_too_long_rejected(secs in 24 * 3600 + 1i64..30 * 24 * 3600) {
            let sleep_time = base();
            let wake_time = sleep_time + TimeDelta::seconds(secs);
            prop_assert!(form_for(sleep_time, wake_time).validate().is_err());
        }

        #[test]
        fn prop_in_range_accepted(secs in 5 * 60i64..=24 * 3600) {
            let sleep_time = base();
            let wake_time = sleep_time + TimeDelta::seconds(secs);
            let record = form_for(sleep_time, wake_time).validate().unwrap();
            prop_assert_eq!(record.duration(), TimeDelta::seconds(secs));
        }
    }
}
