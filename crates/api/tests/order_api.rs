//! HTTP-level integration tests for the order endpoints.
//!
//! Tests cover creation, customer scoping, pagination and status filtering,
//! and partial updates with the merged location invariant.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json, post_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register a user via the API and return their bearer token.
async fn register_and_token(app: axum::Router, number: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "name": "Order Tester",
            "number": number,
            "password": "secret123",
            "repeatPassword": "secret123",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// A complete, valid create-order payload.
fn order_body() -> serde_json::Value {
    serde_json::json!({
        "serviceType": "wash-and-fold",
        "pickupDate": "2026-09-14",
        "pickupTime": "14:05",
        "deliveryDate": "2026-09-16",
        "deliveryTime": "2:05 PM",
        "pickupLocation": { "coordinates": [31.2357, 30.0444] },
        "pickupAddress": "",
        "pickupPlaceId": "place-pickup-1",
        "deliveryLocation": null,
        "deliveryAddress": "221B Baker St",
        "deliveryPlaceId": "place-delivery-1",
        "instructions": "ring twice",
        "garmentCount": 5,
        "totalPrice": 12.5,
        "status": "pending",
    })
}

/// Create an order via the API and return its JSON representation.
async fn create_order(app: axum::Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/orders", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"].clone()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// A valid payload creates the order and returns its wire form.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_order_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;

    let order = create_order(app, &token, order_body()).await;

    assert!(order["id"].is_number());
    assert!(order["customer"].is_number());
    assert_eq!(order["serviceType"], "wash-and-fold");
    assert_eq!(order["garmentCount"], 5);
    assert_eq!(order["totalPrice"], 12.5);
    assert_eq!(order["status"], "pending");
    // Locations come back in GeoJSON point form, or null where absent.
    assert_eq!(order["pickupLocation"]["type"], "Point");
    assert_eq!(order["pickupLocation"]["coordinates"][0], 31.2357);
    assert_eq!(order["pickupLocation"]["coordinates"][1], 30.0444);
    assert!(order["deliveryLocation"].is_null());
    assert_eq!(order["deliveryAddress"], "221B Baker St");
}

/// An incomplete payload fails with one message per bad field.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_order_validation_errors(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;

    let response = post_json_auth(
        app,
        "/api/v1/orders",
        serde_json::json!({ "serviceType": "wash-and-fold", "garmentCount": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_FAILED");
    assert_eq!(json["errors"]["garmentCountError"], "garmentCount must be an integer >= 1");
    assert_eq!(json["errors"]["totalPriceError"], "Total price is required");
    assert_eq!(
        json["errors"]["pickupAddressError"],
        "Provide either pickup location or a detailed pickup address."
    );
    assert!(json["errors"].get("serviceTypeError").is_none());
}

/// Creation without a token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_order_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/orders", order_body()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Listing returns only the caller's orders, newest first, with totals.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_my_orders_scoped_and_paginated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;
    let other_token = register_and_token(app.clone(), "0100000002").await;

    for _ in 0..3 {
        create_order(app.clone(), &token, order_body()).await;
    }
    create_order(app.clone(), &other_token, order_body()).await;

    let response = get_auth(app.clone(), "/api/v1/orders/my", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["orders"].as_array().unwrap().len(), 3);

    // Explicit pagination.
    let response = get_auth(app, "/api/v1/orders/my?page=2&limit=2", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 2);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["orders"].as_array().unwrap().len(), 1);
}

/// The status filter narrows the listing and the total.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_my_orders_status_filter(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;

    create_order(app.clone(), &token, order_body()).await;
    let mut ready = order_body();
    ready["status"] = serde_json::json!("ready");
    create_order(app.clone(), &token, ready).await;

    let response = get_auth(app, "/api/v1/orders/my?status=ready", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["orders"][0]["status"], "ready");
}

// ---------------------------------------------------------------------------
// Fetch by id
// ---------------------------------------------------------------------------

/// An owner can fetch their order by id.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_my_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;
    let order = create_order(app.clone(), &token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/orders/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
}

/// Another customer's order is indistinguishable from a missing one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_other_customers_order_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner_token = register_and_token(app.clone(), "0100000001").await;
    let other_token = register_and_token(app.clone(), "0100000002").await;
    let order = create_order(app.clone(), &owner_token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/orders/{id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A nonexistent id is a plain 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_missing_order_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;

    let response = get_auth(app, "/api/v1/orders/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// A status-only patch changes nothing else.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_status_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;
    let order = create_order(app.clone(), &token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/orders/{id}"),
        serde_json::json!({ "status": "in_progress" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["garmentCount"], 5);
    assert_eq!(json["data"]["deliveryAddress"], "221B Baker St");
}

/// An unknown status value is rejected with the allowed set.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_invalid_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;
    let order = create_order(app.clone(), &token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/orders/{id}"),
        serde_json::json!({ "status": "done" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(
        json["errors"]["statusError"],
        "Status must be one of: pending, in_progress, ready, completed"
    );
}

/// Clearing the only location source violates the merged invariant.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_cannot_clear_only_location_source(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;
    // The stored pickup side relies on its geo point (empty address).
    let order = create_order(app.clone(), &token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/orders/{id}"),
        serde_json::json!({ "pickupLocation": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(
        json["errors"]["pickupAddressError"],
        "Provide either pickup location or a detailed pickup address."
    );
}

/// Clearing a location together with a replacement address is accepted, and
/// the point comes back null.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_swap_location_for_address(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(app.clone(), "0100000001").await;
    let order = create_order(app.clone(), &token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/orders/{id}"),
        serde_json::json!({ "pickupLocation": null, "pickupAddress": "10 Downing St" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["pickupLocation"].is_null());
    assert_eq!(json["data"]["pickupAddress"], "10 Downing St");
}

// ---------------------------------------------------------------------------
// Storage backstop
// ---------------------------------------------------------------------------

/// The geo column pairs are all-or-nothing at the database level: a row with
/// only one coordinate set is rejected by the table constraint.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_half_null_geo_pair_rejected_by_database(pool: PgPool) {
    let (customer_id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (name, number, password_hash)
         VALUES ('Geo Tester', '0100000009', 'not-a-real-hash')
         RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .expect("user insert should succeed");

    let result = sqlx::query(
        "INSERT INTO orders (customer_id, service_type,
             pickup_date, pickup_time, delivery_date, delivery_time,
             pickup_lng, pickup_lat, pickup_place_id,
             delivery_address, delivery_place_id,
             garment_count, total_price, status)
         VALUES ($1, 'wash-and-fold', '2026-09-14', '14:05', '2026-09-16', '15:05',
                 31.2357, NULL, 'place-pickup-1',
                 '221B Baker St', 'place-delivery-1',
                 1, 0, 'pending')",
    )
    .bind(customer_id)
    .execute(&pool)
    .await;

    let err = result.expect_err("a lone longitude must violate the pickup geo constraint");
    assert!(
        err.to_string().contains("ck_orders_pickup_geo"),
        "unexpected error: {err}"
    );
}

/// Another customer cannot patch an order they do not own.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_other_customers_order_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner_token = register_and_token(app.clone(), "0100000001").await;
    let other_token = register_and_token(app.clone(), "0100000002").await;
    let order = create_order(app.clone(), &owner_token, order_body()).await;
    let id = order["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/orders/{id}"),
        serde_json::json!({ "status": "ready" }),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
