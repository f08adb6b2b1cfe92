//! User API handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::store::models::User;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, now_millis};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 16, max = 120))]
    pub age: u32,
    pub contact_number: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Contact attributes only; email and password changes are out of scope
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub contact_number: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/users/create - register a new member
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    validate_required_text(&payload.first_name, "firstName", MAX_NAME_LEN)?;
    validate_required_text(&payload.last_name, "lastName", MAX_NAME_LEN)?;
    validate_required_text(&payload.contact_number, "contactNumber", MAX_SHORT_TEXT_LEN)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        age: payload.age,
        contact_number: payload.contact_number,
        password_hash: Some(auth::hash_password(&payload.password)?),
        created_at: now_millis(),
    };
    state.store.create_user(&user)?;

    let token = state
        .jwt_service
        .generate_token(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "member registered");
    Ok(Json(AuthResponse {
        user: user.profile(),
        token,
    }))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<TokenResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // Unknown email and wrong password produce the same error
    let user = state
        .store
        .find_user_by_email(&payload.email)?
        .ok_or_else(AppError::invalid_credentials)?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(AppError::invalid_credentials)?;
    if !auth::verify_password(&payload.password, stored_hash) {
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(Json(TokenResponse { token }))
}

/// GET /api/users/get - current member's profile
pub async fn get(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .get_user(&current_user.id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user.profile()))
}

/// PUT /api/users/update - update contact attributes
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UpdatePayload>,
) -> AppResult<Json<User>> {
    validate_optional_text(&payload.first_name, "firstName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.last_name, "lastName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.contact_number, "contactNumber", MAX_SHORT_TEXT_LEN)?;

    let mut user = state
        .store
        .get_user(&current_user.id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Some(first_name) = payload.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = last_name;
    }
    if let Some(age) = payload.age {
        user.age = age;
    }
    if let Some(contact_number) = payload.contact_number {
        user.contact_number = contact_number;
    }

    state.store.update_user(&user)?;
    Ok(Json(user.profile()))
}

/// DELETE /api/users/delete - delete the current member
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.store.delete_user(&current_user.id)? {
        return Err(AppError::not_found("User not found"));
    }
    Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
}
