//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use shopkeep_core::UserId;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

use super::JsonBody;

/// Body of `POST /api/user/create`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Register a user together with an empty cart.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.repos().users.as_ref())
        .register(
            &request.username,
            request.password.as_deref(),
            request.confirm_password.as_deref(),
        )
        .await
        .inspect_err(|e| {
            tracing::warn!(username = %request.username, error = %e, "user creation rejected");
        })?;

    Ok(Json(user))
}

/// Look up a user by username.
pub async fn find_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>> {
    state
        .repos()
        .users
        .find_by_username(&username)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))
}

/// Look up a user by ID.
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    state
        .repos()
        .users
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user id {id}")))
}
