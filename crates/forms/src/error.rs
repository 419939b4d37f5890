//! Validation Error Types

use std::collections::BTreeMap;
use thiserror::Error;

/// A single validation failure. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("This field is required.")]
    Required,

    #[error("Enter a valid date/time.")]
    InvalidDateTime,

    #[error("Wake time must be after sleep time.")]
    WakeNotAfterSleep,

    #[error("Sleep must last at least {min_minutes} minutes.")]
    TooShort { min_minutes: i64 },

    #[error("Sleep cannot last more than {max_hours} hours.")]
    TooLong { max_hours: i64 },

    #[error("Ensure this value has at most {max} characters.")]
    UsernameTooLong { max: usize },

    #[error("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.")]
    UsernameInvalid,

    #[error("A user with that username already exists.")]
    UsernameTaken,

    #[error("The two password fields didn't match.")]
    PasswordMismatch,

    #[error("This password is too short. It must contain at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("This password is entirely numeric.")]
    PasswordNumeric,

    #[error("The password is too similar to the username.")]
    PasswordSimilarToUsername,

    #[error("Please enter a correct username and password. Note that both fields may be case-sensitive.")]
    InvalidCredentials,
}

/// All failures for one submission, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<FormError>>,
    non_field: Vec<FormError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors carrying only a form-level failure
    pub fn from_non_field(error: FormError) -> Self {
        let mut errors = Self::new();
        errors.add_non_field(error);
        errors
    }

    pub fn add_field(&mut self, field: &'static str, error: FormError) {
        self.fields.entry(field).or_default().push(error);
    }

    pub fn add_non_field(&mut self, error: FormError) {
        self.non_field.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> &[FormError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[FormError] {
        &self.non_field
    }

    /// `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}
