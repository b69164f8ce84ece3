//! The form predicates as garde custom validators
//!
//! Lets a typed, server-side struct enforce the same rules a dynamic form
//! schema declares:
//!
//! ```ignore
//! use garde::Validate;
//!
//! #[derive(Validate)]
//! struct Signup {
//!     #[garde(custom(email_format))]
//!     email: String,
//!     #[garde(custom(|v: &str, _: &()| min_chars(v, 5)))]
//!     handle: String,
//! }
//! ```

use crate::email::is_valid_email;
use crate::string::{char_len, meets_max_length, meets_min_length};

/// Validator: email format, skipping empty values
pub fn email_format(value: &str, _ctx: &()) -> Result<(), garde::Error> {
    if value.is_empty() || is_valid_email(value) {
        Ok(())
    } else {
        Err(garde::Error::new("not a valid email address"))
    }
}

/// Validator: minimum length in characters, skipping empty values
pub fn min_chars(value: &str, min: usize) -> Result<(), garde::Error> {
    if meets_min_length(char_len(value), min) {
        Ok(())
    } else {
        Err(garde::Error::new(format!("must be at least {} characters", min)))
    }
}

/// Validator: maximum length in characters
pub fn max_chars(value: &str, max: usize) -> Result<(), garde::Error> {
    if meets_max_length(char_len(value), max) {
        Ok(())
    } else {
        Err(garde::Error::new(format!("must be at most {} characters", max)))
    }
}
