//! Order entity model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use suds_core::error::CoreError;
use suds_core::order::{parse_date, GeoPoint, OrderDraft};
use suds_core::types::{DbId, Timestamp};
use suds_core::validation::order::OrderSnapshot;

/// Full order row from the `orders` table. Geo points are stored as nullable
/// lng/lat column pairs; either both are set or neither is.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: DbId,
    pub customer_id: DbId,
    pub service_type: String,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub delivery_date: NaiveDate,
    pub delivery_time: String,
    pub pickup_lng: Option<f64>,
    pub pickup_lat: Option<f64>,
    pub pickup_address: String,
    pub pickup_place_id: String,
    pub delivery_lng: Option<f64>,
    pub delivery_lat: Option<f64>,
    pub delivery_address: String,
    pub delivery_place_id: String,
    pub instructions: String,
    pub garment_count: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn pickup_location(&self) -> Option<GeoPoint> {
        point_from_columns(self.pickup_lng, self.pickup_lat)
    }

    pub fn delivery_location(&self) -> Option<GeoPoint> {
        point_from_columns(self.delivery_lng, self.delivery_lat)
    }

    /// Location state handed to `validate_update_order` for merge checking.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            pickup_location: self.pickup_location(),
            pickup_address: self.pickup_address.clone(),
            delivery_location: self.delivery_location(),
            delivery_address: self.delivery_address.clone(),
        }
    }

    /// Apply a validated, sanitized patch: only keys present in the map are
    /// touched. A `null` location clears the stored point.
    ///
    /// The patch must come from a passing `validate_update_order` verdict; a
    /// type mismatch here is a caller bug surfaced as an internal error.
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) -> Result<(), CoreError> {
        for (key, value) in patch {
            match key.as_str() {
                "serviceType" => self.service_type = patch_string(key, value)?,
                "pickupDate" => self.pickup_date = patch_date(key, value)?,
                "pickupTime" => self.pickup_time = patch_string(key, value)?,
                "deliveryDate" => self.delivery_date = patch_date(key, value)?,
                "deliveryTime" => self.delivery_time = patch_string(key, value)?,
                "pickupLocation" => {
                    let point = patch_point(value);
                    self.pickup_lng = point.map(|p| p.lng);
                    self.pickup_lat = point.map(|p| p.lat);
                }
                "pickupAddress" => self.pickup_address = patch_string(key, value)?,
                "pickupPlaceId" => self.pickup_place_id = patch_string(key, value)?,
                "deliveryLocation" => {
                    let point = patch_point(value);
                    self.delivery_lng = point.map(|p| p.lng);
                    self.delivery_lat = point.map(|p| p.lat);
                }
                "deliveryAddress" => self.delivery_address = patch_string(key, value)?,
                "deliveryPlaceId" => self.delivery_place_id = patch_string(key, value)?,
                "instructions" => self.instructions = patch_string(key, value)?,
                "garmentCount" => self.garment_count = patch_number(key, value)? as i32,
                "totalPrice" => self.total_price = patch_number(key, value)?,
                "status" => self.status = patch_string(key, value)?,
                // Unknown keys cannot appear in a sanitized payload.
                other => {
                    return Err(CoreError::Internal(format!(
                        "unexpected field {other} in sanitized patch"
                    )))
                }
            }
        }
        Ok(())
    }
}

fn point_from_columns(lng: Option<f64>, lat: Option<f64>) -> Option<GeoPoint> {
    match (lng, lat) {
        (Some(lng), Some(lat)) => GeoPoint::new(lng, lat),
        _ => None,
    }
}

fn patch_string(key: &str, value: &Value) -> Result<String, CoreError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| unvalidated(key))
}

fn patch_number(key: &str, value: &Value) -> Result<f64, CoreError> {
    value.as_f64().ok_or_else(|| unvalidated(key))
}

fn patch_date(key: &str, value: &Value) -> Result<NaiveDate, CoreError> {
    parse_date(value).ok_or_else(|| unvalidated(key))
}

fn patch_point(value: &Value) -> Option<GeoPoint> {
    GeoPoint::from_value(value)
}

fn unvalidated(key: &str) -> CoreError {
    CoreError::Internal(format!("unvalidated value for field {key} in patch"))
}

/// Wire representation of an order, camelCase keys, locations in GeoJSON
/// point form or `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: DbId,
    pub customer: DbId,
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
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            customer: o.customer_id,
            service_type: o.service_type.clone(),
            pickup_date: o.pickup_date,
            pickup_time: o.pickup_time.clone(),
            delivery_date: o.delivery_date,
            delivery_time: o.delivery_time.clone(),
            pickup_location: o.pickup_location(),
            pickup_address: o.pickup_address.clone(),
            pickup_place_id: o.pickup_place_id.clone(),
            delivery_location: o.delivery_location(),
            delivery_address: o.delivery_address.clone(),
            delivery_place_id: o.delivery_place_id.clone(),
            instructions: o.instructions.clone(),
            garment_count: o.garment_count,
            total_price: o.total_price,
            status: o.status.clone(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// Everything needed to insert an order: the validated draft plus the
/// authoritative owner taken from the caller's token, never the payload.
#[derive(Debug)]
pub struct CreateOrder {
    pub customer_id: DbId,
    pub draft: OrderDraft,
}
