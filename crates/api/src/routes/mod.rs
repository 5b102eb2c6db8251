pub mod auth;
pub mod health;
pub mod orders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register       register (public)
/// /auth/login          login (public)
/// /auth/me             current user profile (requires auth)
///
/// /orders              create (requires auth)
/// /orders/my           list own orders (requires auth)
/// /orders/{id}         get, update own order (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/orders", orders::router())
}
