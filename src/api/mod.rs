//! API routing module
//!
//! # Structure
//!
//! - [`health`] - public liveness probe
//! - [`users`] - registration, login, profile
//! - [`items`] - catalog CRUD and search
//! - [`cart`] - cart staging (add/remove/list)
//! - [`orders`] - checkout, OTP-verified closure, ledger projections

pub mod cart;
pub mod health;
pub mod items;
pub mod orders;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(items::router())
        .merge(cart::router())
        .merge(orders::router())
}

/// Build the fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // JWT authentication - runs before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
}
