//! Item catalog API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/getAll", get(handler::get_all))
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id))
}
