//! Item catalog API handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::store::models::{Category, Item};
use crate::utils::validation::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, now_millis};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring match on the item name
    pub query: Option<String>,
    /// Comma-separated category filter
    pub categories: Option<String>,
}

/// Item enriched with the seller's display name
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithSeller {
    #[serde(flatten)]
    pub item: Item,
    pub seller_name: String,
}

/// POST /api/items/create - list an item for sale (seller = current member)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateItemPayload>,
) -> AppResult<Json<Item>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    if payload.price <= Decimal::ZERO {
        return Err(AppError::validation("price must be positive"));
    }

    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
        price: payload.price.round_dp(2),
        category: payload.category,
        seller_id: current_user.id,
        created_at: now_millis(),
    };
    state.store.put_item(&item)?;

    tracing::info!(item_id = %item.id, seller_id = %item.seller_id, "item listed");
    Ok(Json(item))
}

/// GET /api/items/getAll
pub async fn get_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Item>>> {
    let items = state.store.list_all_items()?;
    Ok(Json(items))
}

/// GET /api/items/search?query=&categories=
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<ItemWithSeller>>> {
    let needle = params
        .query
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    let categories: Option<Vec<Category>> = match params.categories.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<Category>().map_err(AppError::validation))
                .collect::<Result<_, _>>()?,
        ),
    };

    let mut results = Vec::new();
    for item in state.store.list_all_items()? {
        if !needle.is_empty() && !item.name.to_lowercase().contains(&needle) {
            continue;
        }
        if let Some(wanted) = &categories
            && !wanted.contains(&item.category)
        {
            continue;
        }
        results.push(with_seller(&state, item)?);
    }
    Ok(Json(results))
}

/// GET /api/items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ItemWithSeller>> {
    let item = state
        .store
        .get_item(&id)?
        .ok_or_else(|| AppError::not_found(format!("Item {id}")))?;
    Ok(Json(with_seller(&state, item)?))
}

fn with_seller(state: &ServerState, item: Item) -> AppResult<ItemWithSeller> {
    let seller_name = state
        .store
        .get_user(&item.seller_id)?
        .map(|u| u.display_name())
        .unwrap_or_else(|| "(unknown member)".to_string());
    Ok(ItemWithSeller { item, seller_name })
}
