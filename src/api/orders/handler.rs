//! Order API handlers
//!
//! Checkout, OTP-verified closure and the four ledger projections.

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::market::{engine, query};
use crate::store::models::{Order, OrderStatus};
use crate::utils::AppResult;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePayload {
    pub order_id: String,
    pub otp: String,
}

#[derive(Serialize)]
pub struct CloseResponse {
    pub status: OrderStatus,
}

/// POST /api/orders/place - convert the whole cart into orders
///
/// The response is the single point where each order's plaintext OTP is
/// handed to the buyer.
pub async fn place(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = engine::place_order(&state.store, &current_user.id)?;
    Ok(Json(orders))
}

/// POST /api/orders/close - seller confirms handover with the buyer's OTP
pub async fn close(
    State(state): State<ServerState>,
    Json(payload): Json<ClosePayload>,
) -> AppResult<Json<CloseResponse>> {
    let order = engine::close_transaction(&state.store, &payload.order_id, &payload.otp)?;
    Ok(Json(CloseResponse {
        status: order.status,
    }))
}

/// GET /api/orders/seller - pending orders to deliver
pub async fn pending_for_seller(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<query::OrderView>>> {
    let views = query::pending_for_seller(&state.store, &current_user.id)?;
    Ok(Json(views))
}

/// GET /api/orders/pending - buyer's orders awaiting pickup (includes OTPs)
pub async fn pending_for_buyer(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<query::OrderView>>> {
    let views = query::pending_for_buyer(&state.store, &current_user.id)?;
    Ok(Json(views))
}

/// GET /api/orders/bought
pub async fn bought(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<query::OrderView>>> {
    let views = query::completed_bought(&state.store, &current_user.id)?;
    Ok(Json(views))
}

/// GET /api/orders/sold
pub async fn sold(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<query::OrderView>>> {
    let views = query::completed_sold(&state.store, &current_user.id)?;
    Ok(Json(views))
}
