//! Form Validation
//!
//! Checks raw form input before anything reaches the store. Every form
//! either yields a fully valid value or a [`FormErrors`] listing all
//! problems; there is no partial acceptance.

mod error;
mod login;
mod record;
mod signup;

pub use error::{FormError, FormErrors};
pub use login::{redirect_target, Credentials, LoginForm};
pub use record::{parse_datetime, RecordLimits, SleepRecordForm};
pub use signup::{SignupForm, ValidSignup, MAX_USERNAME_LEN, MIN_PASSWORD_LEN};
