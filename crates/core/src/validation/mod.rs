//! The validation core: sanitize first, then validate.
//!
//! Each rule is a pure function `(sanitized value, context) -> Option<FieldError>`;
//! a verdict folds all rule outputs into one field-keyed error map. Validators
//! never fail for expected bad input -- the returned verdict is the result.

pub mod auth;
pub mod fields;
pub mod location;
pub mod order;
pub mod sanitize;

use std::collections::BTreeMap;

/// Field-keyed error messages, keys following the `<field>Error` pattern.
pub type ErrorMap = BTreeMap<String, String>;

/// A single failed rule: which field key it belongs to and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

impl FieldError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Fold a rule outcome into the error map. First message per key wins, which
/// keeps the verdict one-message-per-field.
pub(crate) fn record(errors: &mut ErrorMap, outcome: Option<FieldError>) {
    if let Some(e) = outcome {
        errors.entry(e.key).or_insert(e.message);
    }
}
