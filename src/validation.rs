//! Field rules shared by the request types: phone numbers, password strength
//! and blank-string handling.

use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    static ref NON_DIGIT_REGEX: Regex = Regex::new(r"[^0-9]").unwrap();
    static ref LETTER_REGEX: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref DIGIT_REGEX: Regex = Regex::new(r"[0-9]").unwrap();
}

/// Formats a North American number as `(555) 123-4567`.
///
/// Anything but ASCII digits is ignored. Ten digits, or eleven with a leading
/// country code `1`, are accepted; anything else yields `None`.
pub fn normalize_phone(input: &str) -> Option<String> {
    let digits = NON_DIGIT_REGEX.replace_all(input, "");
    let digits = match digits.len() {
        10 => &digits[..],
        11 if digits.starts_with('1') => &digits[1..],
        _ => return None,
    };
    Some(format!(
        "({}) {}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..10]
    ))
}

/// An empty phone is allowed (it means "no phone"); anything else must normalize.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() || normalize_phone(phone).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("phone");
    error.message = Some("Phone number must have 10 digits".into());
    Err(error)
}

/// Requires at least one letter and one digit. Length is checked separately.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if LETTER_REGEX.is_match(password) && DIGIT_REGEX.is_match(password) {
        return Ok(());
    }
    let mut error = ValidationError::new("password_strength");
    error.message = Some("Password must contain at least one letter and one number".into());
    Err(error)
}

/// Trims an optional string and turns a blank one into `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
