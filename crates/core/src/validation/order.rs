//! Create/update order validation.
//!
//! Create requires every field and both location invariants. Update is
//! partial: only keys present in the original input are validated, and the
//! location invariant runs against a merged view of patch and stored values.

use serde_json::{Map, Value};

use super::fields;
use super::location::{geo_shape, require_either, valid_geo};
use super::sanitize::{sanitize_order, str_field, value_field};
use super::{record, ErrorMap};
use crate::order::GeoPoint;

/// Stored-order location state, fetched by the caller for merge validation.
/// Stored points are valid by construction, so presence alone satisfies the
/// geo side of the invariant.
#[derive(Debug, Clone, Default)]
pub struct OrderSnapshot {
    pub pickup_location: Option<GeoPoint>,
    pub pickup_address: String,
    pub delivery_location: Option<GeoPoint>,
    pub delivery_address: String,
}

/// Verdict plus the sanitized payload the caller should persist -- exactly
/// what was validated, not the raw input.
#[derive(Debug, Clone)]
pub struct OrderVerdict {
    pub valid: bool,
    pub errors: ErrorMap,
    pub sanitized: Map<String, Value>,
}

impl OrderVerdict {
    fn new(errors: ErrorMap, sanitized: Map<String, Value>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            sanitized,
        }
    }
}

/// Validate a full create payload. All fields are required.
pub fn validate_create_order(raw: &Map<String, Value>) -> OrderVerdict {
    let d = sanitize_order(raw);
    let mut errors = ErrorMap::new();

    record(
        &mut errors,
        fields::non_empty(str_field(&d, "serviceType"), "serviceTypeError", "Service type is required"),
    );

    record(&mut errors, fields::date(value_field(&d, "pickupDate"), "pickupDate", "pickup date"));
    record(&mut errors, fields::time(str_field(&d, "pickupTime"), "pickupTime", "pickup time"));
    record(&mut errors, fields::date(value_field(&d, "deliveryDate"), "deliveryDate", "delivery date"));
    record(&mut errors, fields::time(str_field(&d, "deliveryTime"), "deliveryTime", "delivery time"));

    record(
        &mut errors,
        fields::non_empty(str_field(&d, "pickupPlaceId"), "pickupPlaceIdError", "pickupPlaceId is required"),
    );
    record(
        &mut errors,
        fields::non_empty(str_field(&d, "deliveryPlaceId"), "deliveryPlaceIdError", "deliveryPlaceId is required"),
    );

    record(
        &mut errors,
        require_either(
            valid_geo(value_field(&d, "pickupLocation")),
            str_field(&d, "pickupAddress"),
            "pickupAddress",
            "pickup",
        ),
    );
    record(
        &mut errors,
        require_either(
            valid_geo(value_field(&d, "deliveryLocation")),
            str_field(&d, "deliveryAddress"),
            "deliveryAddress",
            "delivery",
        ),
    );

    let garment_count = value_field(&d, "garmentCount");
    if garment_count.is_null() {
        errors.insert("garmentCountError".into(), "Garment count is required".into());
    } else {
        record(&mut errors, fields::integer_at_least(garment_count, "garmentCount", 1));
    }

    let total_price = value_field(&d, "totalPrice");
    if total_price.is_null() {
        errors.insert("totalPriceError".into(), "Total price is required".into());
    } else {
        record(&mut errors, fields::non_negative_number(total_price, "totalPrice"));
    }

    record(&mut errors, fields::status(str_field(&d, "status"), "Status is required"));

    // A supplied geo object must be well-formed even when an address already
    // satisfies the invariant.
    record(&mut errors, geo_shape(value_field(&d, "pickupLocation"), "pickupLocation"));
    record(&mut errors, geo_shape(value_field(&d, "deliveryLocation"), "deliveryLocation"));

    OrderVerdict::new(errors, d)
}

/// Validate a partial update. Only keys present in `raw` are checked, and the
/// returned sanitized payload contains only those keys. A `null` value counts
/// as present (an attempt to clear the field) and is validated as such.
pub fn validate_update_order(raw: &Map<String, Value>, existing: &OrderSnapshot) -> OrderVerdict {
    let d = sanitize_order(raw);
    let mut errors = ErrorMap::new();
    let present = |key: &str| raw.contains_key(key);

    if present("serviceType") {
        record(
            &mut errors,
            fields::non_empty(str_field(&d, "serviceType"), "serviceTypeError", "Service type cannot be empty"),
        );
    }

    if present("pickupDate") {
        record(&mut errors, fields::date(value_field(&d, "pickupDate"), "pickupDate", "pickup date"));
    }
    if present("pickupTime") {
        record(&mut errors, fields::time(str_field(&d, "pickupTime"), "pickupTime", "pickup time"));
    }
    if present("deliveryDate") {
        record(&mut errors, fields::date(value_field(&d, "deliveryDate"), "deliveryDate", "delivery date"));
    }
    if present("deliveryTime") {
        record(&mut errors, fields::time(str_field(&d, "deliveryTime"), "deliveryTime", "delivery time"));
    }

    if present("pickupPlaceId") {
        record(
            &mut errors,
            fields::non_empty(str_field(&d, "pickupPlaceId"), "pickupPlaceIdError", "pickupPlaceId cannot be empty"),
        );
    }
    if present("deliveryPlaceId") {
        record(
            &mut errors,
            fields::non_empty(str_field(&d, "deliveryPlaceId"), "deliveryPlaceIdError", "deliveryPlaceId cannot be empty"),
        );
    }

    if present("garmentCount") {
        record(&mut errors, fields::integer_at_least(value_field(&d, "garmentCount"), "garmentCount", 1));
    }
    if present("totalPrice") {
        record(&mut errors, fields::non_negative_number(value_field(&d, "totalPrice"), "totalPrice"));
    }
    if present("status") {
        record(&mut errors, fields::status(str_field(&d, "status"), "Status cannot be empty"));
    }

    if present("pickupLocation") {
        record(&mut errors, geo_shape(value_field(&d, "pickupLocation"), "pickupLocation"));
    }
    if present("deliveryLocation") {
        record(&mut errors, geo_shape(value_field(&d, "deliveryLocation"), "deliveryLocation"));
    }

    // Location invariant on the merged view, per side, only when the patch
    // touched that side at all.
    if present("pickupLocation") || present("pickupAddress") {
        let ok_geo = if present("pickupLocation") {
            valid_geo(value_field(&d, "pickupLocation"))
        } else {
            existing.pickup_location.is_some()
        };
        let address = if present("pickupAddress") {
            str_field(&d, "pickupAddress")
        } else {
            existing.pickup_address.as_str()
        };
        record(&mut errors, require_either(ok_geo, address, "pickupAddress", "pickup"));
    }

    if present("deliveryLocation") || present("deliveryAddress") {
        let ok_geo = if present("deliveryLocation") {
            valid_geo(value_field(&d, "deliveryLocation"))
        } else {
            existing.delivery_location.is_some()
        };
        let address = if present("deliveryAddress") {
            str_field(&d, "deliveryAddress")
        } else {
            existing.delivery_address.as_str()
        };
        record(&mut errors, require_either(ok_geo, address, "deliveryAddress", "delivery"));
    }

    let submitted: Map<String, Value> = d
        .into_iter()
        .filter(|(key, _)| raw.contains_key(key))
        .collect();

    OrderVerdict::new(errors, submitted)
}
