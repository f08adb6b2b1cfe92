//! User API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Public routes (the auth middleware whitelists them)
        .route("/create", post(handler::create))
        .route("/login", post(handler::login))
        // Authenticated routes
        .route("/get", get(handler::get))
        .route("/update", put(handler::update))
        .route("/delete", delete(handler::delete))
}
