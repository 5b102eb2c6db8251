//! The "geo OR address" invariant, checked once per side (pickup, delivery).

use serde_json::Value;

use super::FieldError;
use crate::order::GeoPoint;

/// Whether a sanitized location value is a well-formed, in-bounds geo point.
pub fn valid_geo(value: &Value) -> bool {
    GeoPoint::from_value(value).is_some()
}

/// The invariant itself: a valid geo point or a non-empty address. `ok_geo`
/// is precomputed so callers can feed either a payload value or a stored
/// point through the same check.
pub fn require_either(
    ok_geo: bool,
    address: &str,
    field_base: &str,
    side: &str,
) -> Option<FieldError> {
    if ok_geo || !address.trim().is_empty() {
        None
    } else {
        Some(FieldError::new(
            format!("{field_base}Error"),
            format!("Provide either {side} location or a detailed {side} address."),
        ))
    }
}

/// Shape check for a geo object that was supplied at all: even when an
/// address already satisfies the invariant, a malformed point is its own
/// error on the location key.
pub fn geo_shape(value: &Value, base: &str) -> Option<FieldError> {
    if value.is_null() || valid_geo(value) {
        None
    } else {
        Some(FieldError::new(
            format!("{base}Error"),
            format!("{base}.coordinates must be [lng, lat] within valid bounds"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invariant_needs_geo_or_address() {
        // Neither side of the disjunction holds.
        let e = require_either(false, "", "pickupAddress", "pickup").unwrap();
        assert_eq!(e.key, "pickupAddressError");
        assert_eq!(
            e.message,
            "Provide either pickup location or a detailed pickup address."
        );

        // Either alone is enough.
        assert!(require_either(true, "", "pickupAddress", "pickup").is_none());
        assert!(require_either(false, "221B Baker St", "pickupAddress", "pickup").is_none());

        // A whitespace-only address does not count.
        assert!(require_either(false, "   ", "deliveryAddress", "delivery").is_some());
    }

    #[test]
    fn out_of_bounds_geo_does_not_satisfy_invariant() {
        let supplied = json!({ "coordinates": [200, 40] });
        assert!(!valid_geo(&supplied));
        assert!(require_either(valid_geo(&supplied), "", "pickupAddress", "pickup").is_some());
    }

    #[test]
    fn shape_check_flags_malformed_supplied_points_only() {
        assert!(geo_shape(&Value::Null, "pickupLocation").is_none());
        assert!(geo_shape(&json!({ "coordinates": [20, 40] }), "pickupLocation").is_none());

        let e = geo_shape(&json!({ "coordinates": [200, 40] }), "deliveryLocation").unwrap();
        assert_eq!(e.key, "deliveryLocationError");
        assert_eq!(
            e.message,
            "deliveryLocation.coordinates must be [lng, lat] within valid bounds"
        );
    }
}
