//! Register/login validation against the user identity record.
//!
//! The existence flag (`userExist`) is supplied by the caller after a lookup;
//! validators here stay pure. Precedence is deliberate and documented:
//! registration lets "already exists" replace any number format error, while
//! login reports a format error over "does not exist".

use serde_json::{Map, Value};

use super::fields;
use super::sanitize::{bool_field, sanitize_auth, str_field};
use super::{record, ErrorMap};

const MSG_NUMBER_EXISTS: &str = "User already exists";
const MSG_NUMBER_MISSING: &str = "User does not exist";

/// Verdict for the auth validators: no sanitized payload is returned, the
/// caller already holds everything it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthVerdict {
    pub valid: bool,
    pub errors: ErrorMap,
}

impl AuthVerdict {
    fn from_errors(errors: ErrorMap) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a registration payload (`name`, `number`, `password`,
/// `repeatPassword`, `userExist`).
///
/// An existing account always surfaces as "already exists" on the number
/// field, replacing any format error there -- it mirrors what the unique
/// index would report, and keeps the verdict one-message-per-field.
pub fn validate_register(raw: &Map<String, Value>) -> AuthVerdict {
    let d = sanitize_auth(raw);
    let mut errors = ErrorMap::new();

    record(&mut errors, fields::non_empty(str_field(&d, "name"), "nameError", "Name is required"));
    record(&mut errors, fields::phone_number(str_field(&d, "number")));
    record(&mut errors, fields::password(str_field(&d, "password")));
    record(
        &mut errors,
        fields::repeat_password(str_field(&d, "password"), str_field(&d, "repeatPassword")),
    );

    if bool_field(&d, "userExist") {
        errors.insert("numberError".to_string(), MSG_NUMBER_EXISTS.to_string());
    }

    AuthVerdict::from_errors(errors)
}

/// Validate a login payload (`number`, `password`, `userExist`).
///
/// The number format check runs first; only a well-formed number can earn
/// the "does not exist" message.
pub fn validate_login(raw: &Map<String, Value>) -> AuthVerdict {
    let d = sanitize_auth(raw);
    let mut errors = ErrorMap::new();

    if let Some(e) = fields::phone_number(str_field(&d, "number")) {
        errors.insert(e.key, e.message);
    } else if !bool_field(&d, "userExist") {
        errors.insert("numberError".to_string(), MSG_NUMBER_MISSING.to_string());
    }

    record(&mut errors, fields::password(str_field(&d, "password")));

    AuthVerdict::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Map<String, Value> {
        v.as_object().cloned().expect("test input must be an object")
    }

    #[test]
    fn register_accepts_a_well_formed_new_user() {
        let verdict = validate_register(&payload(json!({
            "name": "Alice",
            "number": "0551234567",
            "password": "secret123",
            "repeatPassword": "secret123",
            "userExist": false,
        })));
        assert!(verdict.valid, "unexpected errors: {:?}", verdict.errors);
    }

    #[test]
    fn register_reports_every_missing_field() {
        let verdict = validate_register(&Map::new());
        assert!(!verdict.valid);
        for key in ["nameError", "numberError", "passwordError", "repeatPasswordError"] {
            assert!(verdict.errors.contains_key(key), "missing {key}: {:?}", verdict.errors);
        }
    }

    #[test]
    fn register_existing_user_wins_over_format_error() {
        // Even a malformed number reports "already exists" when the flag is set.
        let verdict = validate_register(&payload(json!({
            "name": "Alice",
            "number": "123",
            "password": "secret123",
            "repeatPassword": "secret123",
            "userExist": true,
        })));
        assert_eq!(verdict.errors["numberError"], "User already exists");
    }

    #[test]
    fn register_rejects_mismatched_passwords() {
        let verdict = validate_register(&payload(json!({
            "name": "Alice",
            "number": "0551234567",
            "password": "secret123",
            "repeatPassword": "secret124",
        })));
        assert_eq!(
            verdict.errors["repeatPasswordError"],
            "Password and repeat password must be the same"
        );
    }

    #[test]
    fn login_flags_nonexistent_user_on_the_number_field() {
        let verdict = validate_login(&payload(json!({
            "number": "0551234567",
            "password": "secret1",
            "userExist": false,
        })));
        assert_eq!(verdict.errors["numberError"], "User does not exist");
    }

    #[test]
    fn login_format_error_precedes_nonexistence() {
        let verdict = validate_login(&payload(json!({
            "number": "123",
            "password": "secret1",
            "userExist": false,
        })));
        assert_eq!(verdict.errors["numberError"], "Number must be exactly 10 digits");
    }

    #[test]
    fn login_passes_for_existing_well_formed_credentials() {
        let verdict = validate_login(&payload(json!({
            "number": "0551234567",
            "password": "secret1",
            "userExist": true,
        })));
        assert!(verdict.valid, "unexpected errors: {:?}", verdict.errors);
    }
}
