//! Account Creation Form

use crate::error::{FormError, FormErrors};
use serde::Deserialize;

pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw input from the signup form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// Signup input that passed every local check.
///
/// Username uniqueness is checked against the store by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<ValidSignup, FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add_field("username", FormError::Required);
        } else if username.chars().count() > MAX_USERNAME_LEN {
            errors.add_field("username", FormError::UsernameTooLong { max: MAX_USERNAME_LEN });
        } else if !username.chars().all(is_username_char) {
            errors.add_field("username", FormError::UsernameInvalid);
        }

        if self.password1.is_empty() {
            errors.add_field("password1", FormError::Required);
        }
        if self.password2.is_empty() {
            errors.add_field("password2", FormError::Required);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add_field("password2", FormError::PasswordMismatch);
        }

        if !errors.has_field("password1") && !errors.has_field("password2") {
            for error in password_problems(&self.password1, username) {
                errors.add_field("password2", error);
            }
        }

        errors.into_result(|| ValidSignup {
            username: username.to_string(),
            password: self.password1.clone(),
        })
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn password_problems(password: &str, username: &str) -> Vec<FormError> {
    let mut problems = Vec::new();

    let lowered = password.to_lowercase();
    let user = username.to_lowercase();
    if !user.is_empty() && (lowered.contains(&user) || user.contains(&lowered)) {
        problems.push(FormError::PasswordSimilarToUsername);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(FormError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        problems.push(FormError::PasswordNumeric);
    }
    problems
}
