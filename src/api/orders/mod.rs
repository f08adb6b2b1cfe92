//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/place", post(handler::place))
        .route("/close", post(handler::close))
        .route("/seller", get(handler::pending_for_seller))
        .route("/pending", get(handler::pending_for_buyer))
        .route("/bought", get(handler::bought))
        .route("/sold", get(handler::sold))
}
