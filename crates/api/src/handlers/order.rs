//! Handlers for the `/orders` resource.
//!
//! Every route is scoped to the authenticated customer. Lookups always filter
//! by both the order id and the caller's user id, so another customer's order
//! is indistinguishable from a missing one (404 either way).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use suds_core::error::CoreError;
use suds_core::order::OrderDraft;
use suds_core::types::DbId;
use suds_core::validation::order::{validate_create_order, validate_update_order};
use suds_db::models::order::{CreateOrder, OrderResponse};
use suds_db::repositories::{clamp_limit, clamp_page, OrderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing the caller's orders.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// Paginated order listing.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub orders: Vec<OrderResponse>,
}

/// POST /api/v1/orders
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderResponse>>)> {
    let verdict = validate_create_order(&input);
    if !verdict.valid {
        return Err(AppError::Unprocessable(verdict.errors));
    }

    let draft = OrderDraft::from_sanitized(&verdict.sanitized)?;
    let order = OrderRepo::create(
        &state.pool,
        &CreateOrder {
            customer_id: auth_user.user_id,
            draft,
        },
    )
    .await?;

    tracing::info!(order_id = order.id, customer_id = auth_user.user_id, "order created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: OrderResponse::from(&order),
        }),
    ))
}

/// GET /api/v1/orders/my
pub async fn list_my(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListOrdersParams>,
) -> AppResult<Json<OrderListResponse>> {
    let page = clamp_page(params.page);
    let limit = clamp_limit(params.limit);

    let (orders, total) = OrderRepo::list_for_customer(
        &state.pool,
        auth_user.user_id,
        params.status.as_deref(),
        page,
        limit,
    )
    .await?;

    Ok(Json(OrderListResponse {
        page,
        limit,
        total,
        orders: orders.iter().map(OrderResponse::from).collect(),
    }))
}

/// GET /api/v1/orders/{id}
pub async fn get_my(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderResponse>>> {
    let order = OrderRepo::find_for_customer(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    Ok(Json(DataResponse {
        data: OrderResponse::from(&order),
    }))
}

/// PATCH /api/v1/orders/{id}
///
/// Partial update. The validator sees both the submitted fields and a
/// snapshot of the stored order so that cross-field invariants hold against
/// the merged result, then only the submitted fields are applied.
pub async fn update_my(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<OrderResponse>>> {
    let mut order = OrderRepo::find_for_customer(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    let verdict = validate_update_order(&input, &order.snapshot());
    if !verdict.valid {
        return Err(AppError::Unprocessable(verdict.errors));
    }

    order.apply_patch(&verdict.sanitized)?;

    let updated = OrderRepo::update(&state.pool, &order)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    tracing::info!(order_id = updated.id, customer_id = auth_user.user_id, "order updated");

    Ok(Json(DataResponse {
        data: OrderResponse::from(&updated),
    }))
}

fn order_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Order",
        id,
    })
}
