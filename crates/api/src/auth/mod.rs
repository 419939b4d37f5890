//! Authentication: password hashing, the session-backed user guard and
//! CSRF tokens.

mod csrf;
mod password;
mod session;

pub use csrf::{csrf_token, verify_csrf, CsrfForm, CSRF_FIELD, CSRF_TOKEN_KEY};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    verify_unknown_user_blocking,
};
pub use session::{login, logout, CurrentUser, LOGIN_URL, SESSION_USER_ID_KEY};
