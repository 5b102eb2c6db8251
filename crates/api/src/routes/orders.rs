//! Route definitions for the `/orders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Routes mounted at `/orders`. All require authentication via the
/// [`AuthUser`](crate::middleware::auth::AuthUser) extractor on each handler.
///
/// ```text
/// POST  /          -> create
/// GET   /my        -> list own orders (page, limit, status filters)
/// GET   /{id}      -> get own order
/// PATCH /{id}      -> partial update of own order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(order::create))
        .route("/my", get(order::list_my))
        .route("/{id}", get(order::get_my).patch(order::update_my))
}
