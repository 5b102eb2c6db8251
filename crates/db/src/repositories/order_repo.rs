//! Repository for the `orders` table. Every read and write is scoped to the
//! owning customer; a foreign order and a missing order are indistinguishable
//! to callers.

use sqlx::PgPool;
use suds_core::types::DbId;

use crate::models::order::{CreateOrder, Order};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, service_type, \
                       pickup_date, pickup_time, delivery_date, delivery_time, \
                       pickup_lng, pickup_lat, pickup_address, pickup_place_id, \
                       delivery_lng, delivery_lat, delivery_address, delivery_place_id, \
                       instructions, garment_count, total_price, status, \
                       created_at, updated_at";

/// Hard cap on page size.
const MAX_LIMIT: i64 = 100;
/// Page size when the caller does not specify one.
const DEFAULT_LIMIT: i64 = 20;

/// Clamp a requested page size to `1..=100`, defaulting to 20.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Provides customer-scoped CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (customer_id, service_type,
                 pickup_date, pickup_time, delivery_date, delivery_time,
                 pickup_lng, pickup_lat, pickup_address, pickup_place_id,
                 delivery_lng, delivery_lat, delivery_address, delivery_place_id,
                 instructions, garment_count, total_price, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        let d = &input.draft;
        sqlx::query_as::<_, Order>(&query)
            .bind(input.customer_id)
            .bind(&d.service_type)
            .bind(d.pickup_date)
            .bind(&d.pickup_time)
            .bind(d.delivery_date)
            .bind(&d.delivery_time)
            .bind(d.pickup_location.map(|p| p.lng))
            .bind(d.pickup_location.map(|p| p.lat))
            .bind(&d.pickup_address)
            .bind(&d.pickup_place_id)
            .bind(d.delivery_location.map(|p| p.lng))
            .bind(d.delivery_location.map(|p| p.lat))
            .bind(&d.delivery_address)
            .bind(&d.delivery_place_id)
            .bind(&d.instructions)
            .bind(d.garment_count)
            .bind(d.total_price)
            .bind(d.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find one order owned by the given customer.
    pub async fn find_for_customer(
        pool: &PgPool,
        id: DbId,
        customer_id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 AND customer_id = $2");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(customer_id)
            .fetch_optional(pool)
            .await
    }

    /// List a customer's orders, newest first, with an optional status filter
    /// and page/limit pagination. Returns the page of rows plus the total
    /// matching count.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
        status: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), sqlx::Error> {
        let offset = (page - 1) * limit;

        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE customer_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Order>(&query)
            .bind(customer_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders
             WHERE customer_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(customer_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok((items, total))
    }

    /// Persist a merged order row (patch already applied in memory).
    ///
    /// Returns `None` if the row no longer exists for this customer.
    pub async fn update(pool: &PgPool, order: &Order) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                service_type = $3,
                pickup_date = $4, pickup_time = $5,
                delivery_date = $6, delivery_time = $7,
                pickup_lng = $8, pickup_lat = $9,
                pickup_address = $10, pickup_place_id = $11,
                delivery_lng = $12, delivery_lat = $13,
                delivery_address = $14, delivery_place_id = $15,
                instructions = $16, garment_count = $17,
                total_price = $18, status = $19,
                updated_at = now()
             WHERE id = $1 AND customer_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(order.id)
            .bind(order.customer_id)
            .bind(&order.service_type)
            .bind(order.pickup_date)
            .bind(&order.pickup_time)
            .bind(order.delivery_date)
            .bind(&order.delivery_time)
            .bind(order.pickup_lng)
            .bind(order.pickup_lat)
            .bind(&order.pickup_address)
            .bind(&order.pickup_place_id)
            .bind(order.delivery_lng)
            .bind(order.delivery_lat)
            .bind(&order.delivery_address)
            .bind(&order.delivery_place_id)
            .bind(&order.instructions)
            .bind(order.garment_count)
            .bind(order.total_price)
            .bind(&order.status)
            .fetch_optional(pool)
            .await
    }
}
