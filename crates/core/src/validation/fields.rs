//! Atomic field rules. Each takes one sanitized value and returns the error
//! it would contribute, or `None` when the value passes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::FieldError;
use crate::order::{is_valid_date, OrderStatus};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Canonical phone number format: exactly ten digits, no punctuation.
static TEN_DIGIT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("static pattern"));

static TIME_24H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("static pattern"));

static TIME_12H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(0?[1-9]|1[0-2]):[0-5]\d\s?(AM|PM)$").expect("static pattern"));

/// Required string: fails with `message` when empty after sanitisation.
pub fn non_empty(value: &str, key: &str, message: &str) -> Option<FieldError> {
    value.is_empty().then(|| FieldError::new(key, message))
}

/// Phone number: required, then the fixed ten-digit pattern.
pub fn phone_number(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::new("numberError", "Number is required"))
    } else if !TEN_DIGIT_NUMBER.is_match(value) {
        Some(FieldError::new(
            "numberError",
            "Number must be exactly 10 digits",
        ))
    } else {
        None
    }
}

/// Password: required, then minimum length.
pub fn password(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::new("passwordError", "Password is required"))
    } else if value.chars().count() < MIN_PASSWORD_LENGTH {
        Some(FieldError::new(
            "passwordError",
            format!("Password length must be at least {MIN_PASSWORD_LENGTH} characters"),
        ))
    } else {
        None
    }
}

/// Repeat password: required, then must equal the password.
pub fn repeat_password(password: &str, repeat: &str) -> Option<FieldError> {
    if repeat.is_empty() {
        Some(FieldError::new(
            "repeatPasswordError",
            "Repeat password is required",
        ))
    } else if password != repeat {
        Some(FieldError::new(
            "repeatPasswordError",
            "Password and repeat password must be the same",
        ))
    } else {
        None
    }
}

/// Calendar date: required, then must parse. `base` is the payload key
/// (e.g. `pickupDate`), `human` the message label (e.g. `pickup date`).
pub fn date(value: &Value, base: &str, human: &str) -> Option<FieldError> {
    let key = format!("{base}Error");
    match value {
        Value::Null => Some(FieldError::new(key, format!("{human} is required"))),
        Value::String(s) if s.is_empty() => {
            Some(FieldError::new(key, format!("{human} is required")))
        }
        v if !is_valid_date(v) => Some(FieldError::new(key, format!("{human} is invalid"))),
        _ => None,
    }
}

/// Time of day: required, then `HH:MM` 24-hour or `H:MM AM/PM` 12-hour.
pub fn time(value: &str, base: &str, human: &str) -> Option<FieldError> {
    let key = format!("{base}Error");
    if value.is_empty() {
        Some(FieldError::new(key, format!("{human} is required")))
    } else if !TIME_24H.is_match(value) && !TIME_12H.is_match(value) {
        Some(FieldError::new(
            key,
            format!("{human} must be HH:MM (24h) or HH:MM AM/PM"),
        ))
    } else {
        None
    }
}

/// Finite integer with a lower bound (garment counts). Values beyond the
/// 32-bit integer range are rejected.
pub fn integer_at_least(value: &Value, base: &str, min: i64) -> Option<FieldError> {
    let key = format!("{base}Error");
    let Some(n) = value.as_f64().filter(|f| f.is_finite()) else {
        return Some(FieldError::new(key, format!("{base} must be a number")));
    };
    if n.fract() != 0.0 || n < min as f64 {
        return Some(FieldError::new(
            key,
            format!("{base} must be an integer >= {min}"),
        ));
    }
    if n > i32::MAX as f64 {
        return Some(FieldError::new(key, format!("{base} is too large")));
    }
    None
}

/// Finite non-negative number (prices).
pub fn non_negative_number(value: &Value, base: &str) -> Option<FieldError> {
    let key = format!("{base}Error");
    let Some(n) = value.as_f64().filter(|f| f.is_finite()) else {
        return Some(FieldError::new(key, format!("{base} must be a number")));
    };
    if n < 0.0 {
        return Some(FieldError::new(key, format!("{base} must be >= 0")));
    }
    None
}

/// Membership in the order-status enumeration. The required/empty message
/// differs between create and patch, so the caller supplies it.
pub fn status(value: &str, empty_message: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::new("statusError", empty_message))
    } else if OrderStatus::parse(value).is_none() {
        Some(FieldError::new(
            "statusError",
            format!("Status must be one of: {}", OrderStatus::allowed()),
        ))
    } else {
        None
    }
}
