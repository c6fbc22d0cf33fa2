//! Email and password validation for the signup/login flow

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates an email address format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(&email.to_lowercase())
}

/// Validates password strength for signup
///
/// Requires at least 8 characters including an uppercase letter, a lowercase
/// letter, a digit, and a special character.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}
