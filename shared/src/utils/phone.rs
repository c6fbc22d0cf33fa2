//! Phone number normalization and validation
//!
//! Phone numbers are keyed in their canonical form: a leading `+` followed by
//! an international number. Validation is deliberately permissive (any country
//! code, 2-15 digits) since codes go wherever the carrier can reach.

use once_cell::sync::Lazy;
use regex::Regex;

/// Permissive international number pattern: optional `+`, no leading zero,
/// 2-15 digits total
static INTL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap()
});

/// Validates a phone number against the permissive international pattern
///
/// Formatting characters (spaces, dashes, parentheses) are not accepted here;
/// callers normalize first.
pub fn is_valid_phone(phone: &str) -> bool {
    INTL_PHONE_REGEX.is_match(phone)
}

/// Normalize a phone number to canonical form
///
/// Strips common formatting characters, validates the remaining digits, and
/// prefixes `+` when absent.
///
/// # Examples
///
/// ```
/// use coop_shared::utils::phone::normalize_phone;
///
/// assert_eq!(normalize_phone("+1 555 123-4567").as_deref(), Some("+15551234567"));
/// assert_eq!(normalize_phone("15551234567").as_deref(), Some("+15551234567"));
/// assert_eq!(normalize_phone("not a number"), None);
/// ```
pub fn normalize_phone(phone: &str) -> Option<String> {
    let cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if !is_valid_phone(digits) {
        return None;
    }

    Some(format!("+{}", digits))
}

/// Mask a phone number for logging (show only the last 4 characters)
///
/// Counts characters rather than bytes; raw request values reach this before
/// normalization and may contain multibyte digits.
pub fn mask_phone(phone: &str) -> String {
    let total = phone.chars().count();
    if total <= 4 {
        return "*".repeat(total);
    }
    let tail: String = phone.chars().skip(total - 4).collect();
    format!("***{}", tail)
}
