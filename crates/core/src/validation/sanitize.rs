//! Input sanitisation: type coercion and trimming before semantic validation.
//!
//! Pure and total: any input mapping produces a canonical mapping in which
//! every expected field is present. Absent or uncoercible values become empty
//! sentinels (`""` / `null`) for the validators to reject; sanitisation itself
//! never fails. Applying it twice yields the same mapping.

use serde_json::{Map, Value};

/// Auth payload fields that are trimmed strings.
const AUTH_TRIMMED: [&str; 2] = ["name", "number"];

/// Auth payload fields kept verbatim (passwords are never trimmed).
const AUTH_VERBATIM: [&str; 2] = ["password", "repeatPassword"];

/// Order payload fields that are trimmed strings.
const ORDER_TRIMMED: [&str; 9] = [
    "serviceType",
    "pickupTime",
    "deliveryTime",
    "pickupAddress",
    "pickupPlaceId",
    "deliveryAddress",
    "deliveryPlaceId",
    "instructions",
    "status",
];

/// Canonicalize a register/login payload.
pub fn sanitize_auth(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for key in AUTH_TRIMMED {
        out.insert(key.to_string(), Value::String(to_trimmed_string(raw.get(key))));
    }
    for key in AUTH_VERBATIM {
        out.insert(key.to_string(), Value::String(to_string(raw.get(key))));
    }
    out.insert("userExist".to_string(), Value::Bool(to_bool(raw.get("userExist"))));
    out
}

/// Canonicalize an order payload.
///
/// Strings are trimmed, counts/prices coerced to numbers where possible,
/// dates passed through (trimmed when strings), location objects passed
/// through for the geo checks to inspect.
pub fn sanitize_order(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for key in ORDER_TRIMMED {
        out.insert(key.to_string(), Value::String(to_trimmed_string(raw.get(key))));
    }
    for key in ["pickupDate", "deliveryDate"] {
        out.insert(key.to_string(), to_date_value(raw.get(key)));
    }
    for key in ["pickupLocation", "deliveryLocation"] {
        out.insert(key.to_string(), to_location_value(raw.get(key)));
    }
    for key in ["garmentCount", "totalPrice"] {
        out.insert(key.to_string(), to_number_value(raw.get(key)));
    }
    out
}

fn to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn to_trimmed_string(value: Option<&Value>) -> String {
    let s = to_string(value);
    s.trim().to_string()
}

/// Boolean coercion accepting the common truthy shapes: `true`, `"true"`,
/// `"1"`, `1`. Everything else is `false`.
fn to_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim(), "true" | "1"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Numeric coercion. Numbers stay numbers, numeric strings become numbers,
/// non-numeric strings survive trimmed so the validator can name them, and
/// anything else collapses to the `null` sentinel.
fn to_number_value(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) => Value::Number(n.clone()),
        Some(Value::Bool(b)) => Value::Number((i64::from(*b)).into()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Some(n) => Value::Number(n),
                None => Value::String(trimmed.to_string()),
            }
        }
        _ => Value::Null,
    }
}

fn to_date_value(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => Value::String(s.trim().to_string()),
        Some(Value::Number(n)) => Value::Number(n.clone()),
        _ => Value::Null,
    }
}

fn to_location_value(value: Option<&Value>) -> Value {
    match value {
        Some(v @ Value::Object(_)) => v.clone(),
        _ => Value::Null,
    }
}

/// The field's string content, `""` for anything non-string.
pub fn str_field<'a>(d: &'a Map<String, Value>, key: &str) -> &'a str {
    d.get(key).and_then(Value::as_str).unwrap_or_default()
}

pub fn bool_field(d: &Map<String, Value>, key: &str) -> bool {
    d.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// The field's value, `null` when absent.
pub fn value_field<'a>(d: &'a Map<String, Value>, key: &str) -> &'a Value {
    d.get(key).unwrap_or(&Value::Null)
}
