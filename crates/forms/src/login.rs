//! Login Form

use crate::error::{FormError, FormErrors};
use serde::Deserialize;

/// Raw input from the login form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: String,
}

/// Non-empty credentials, not yet checked against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.add_field("username", FormError::Required);
        }
        if self.password.is_empty() {
            errors.add_field("password", FormError::Required);
        }
        errors.into_result(|| Credentials {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }

    pub fn redirect_target(&self) -> &str {
        redirect_target(&self.next)
    }
}

/// Where to send the user after login.
///
/// Only local absolute paths are followed; anything else goes to `/`.
pub fn redirect_target(next: &str) -> &str {
    let is_local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control);
    if is_local {
        next
    } else {
        "/"
    }
}
