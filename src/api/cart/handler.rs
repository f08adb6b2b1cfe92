//! Cart API handlers
//!
//! Thin wrappers over [`market::cart`]; the caller identity comes from the
//! authenticated request, the cart logic lives in the core.

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::market::cart;
use crate::store::models::Item;
use crate::utils::AppResult;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPayload {
    pub item_id: String,
}

/// POST /api/cart/add
pub async fn add(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CartItemPayload>,
) -> AppResult<Json<Vec<Item>>> {
    let items = cart::add_item(&state.store, &current_user.id, &payload.item_id)?;
    Ok(Json(items))
}

/// POST /api/cart/remove
pub async fn remove(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CartItemPayload>,
) -> AppResult<Json<Vec<Item>>> {
    let items = cart::remove_item(&state.store, &current_user.id, &payload.item_id)?;
    Ok(Json(items))
}

/// GET /api/cart
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Item>>> {
    let items = cart::list_items(&state.store, &current_user.id)?;
    Ok(Json(items))
}
