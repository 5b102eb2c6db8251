//! Order domain types: the workflow status enumeration, geographic points,
//! calendar-date parsing, and the typed draft built from a validated payload.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Workflow state of an order. Wire-stable snake_case values.
///
/// Transitions are deliberately unenforced: any member of the enumeration is
/// accepted on update regardless of the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Ready,
        Self::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Comma-separated list of all valid values, for error messages.
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A location as `[longitude, latitude]` within world-coordinate bounds.
///
/// Construction is validating: a `GeoPoint` that exists is always finite and
/// in bounds, so downstream code never re-checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Option<Self> {
        let in_bounds = lng.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lng)
            && (-90.0..=90.0).contains(&lat);
        in_bounds.then_some(Self { lng, lat })
    }

    /// Parse a `{ "coordinates": [lng, lat] }` value. Numeric strings are
    /// coerced. Returns `None` for any malformed or out-of-bounds shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let coords = value.get("coordinates")?.as_array()?;
        if coords.len() != 2 {
            return None;
        }
        let lng = coerce_f64(&coords[0])?;
        let lat = coerce_f64(&coords[1])?;
        Self::new(lng, lat)
    }
}

// Serializes in GeoJSON point form, matching the stored document shape.
impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("GeoPoint", 2)?;
        s.serialize_field("type", "Point")?;
        s.serialize_field("coordinates", &[self.lng, self.lat])?;
        s.end()
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Parse a calendar date from a payload value.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (date part taken), or a Unix
/// epoch in milliseconds.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(date);
            }
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        }
        Value::Number(n) => {
            let millis = n.as_f64().filter(|f| f.is_finite())?;
            chrono::DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

pub fn is_valid_date(value: &Value) -> bool {
    parse_date(value).is_some()
}

/// Fully typed order payload, produced from a create verdict's sanitized map.
///
/// Conversion only succeeds on a payload that passed `validate_create_order`;
/// a failure here means the caller skipped validation.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub service_type: String,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub delivery_date: NaiveDate,
    pub delivery_time: String,
    pub pickup_location: Option<GeoPoint>,
    pub pickup_address: String,
    pub pickup_place_id: String,
    pub delivery_location: Option<GeoPoint>,
    pub delivery_address: String,
    pub delivery_place_id: String,
    pub instructions: String,
    pub garment_count: i32,
    pub total_price: f64,
    pub status: OrderStatus,
}

impl OrderDraft {
    pub fn from_sanitized(d: &Map<String, Value>) -> Result<Self, CoreError> {
        Ok(Self {
            service_type: string_of(d, "serviceType"),
            pickup_date: date_of(d, "pickupDate")?,
            pickup_time: string_of(d, "pickupTime"),
            delivery_date: date_of(d, "deliveryDate")?,
            delivery_time: string_of(d, "deliveryTime"),
            pickup_location: d.get("pickupLocation").and_then(GeoPoint::from_value),
            pickup_address: string_of(d, "pickupAddress"),
            pickup_place_id: string_of(d, "pickupPlaceId"),
            delivery_location: d.get("deliveryLocation").and_then(GeoPoint::from_value),
            delivery_address: string_of(d, "deliveryAddress"),
            delivery_place_id: string_of(d, "deliveryPlaceId"),
            instructions: string_of(d, "instructions"),
            garment_count: number_of(d, "garmentCount")? as i32,
            total_price: number_of(d, "totalPrice")?,
            status: OrderStatus::parse(&string_of(d, "status"))
                .ok_or_else(|| unvalidated("status"))?,
        })
    }
}

fn string_of(d: &Map<String, Value>, key: &str) -> String {
    d.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn number_of(d: &Map<String, Value>, key: &str) -> Result<f64, CoreError> {
    d.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| unvalidated(key))
}

fn date_of(d: &Map<String, Value>, key: &str) -> Result<NaiveDate, CoreError> {
    d.get(key)
        .and_then(|v| parse_date(v))
        .ok_or_else(|| unvalidated(key))
}

fn unvalidated(key: &str) -> CoreError {
    CoreError::Internal(format!("sanitized payload missing validated field {key}"))
}
