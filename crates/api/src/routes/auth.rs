//! Login and logout handlers.
//!
//! A successful login stores a [`CurrentUser`] in the session; the session
//! cookie is what `require_auth_middleware` checks when auth is enforced.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

use super::JsonBody;

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.repos().users.as_ref())
        .login(&request.username, &request.password)
        .await
        .inspect_err(|_| {
            tracing::warn!(username = %request.username, "login failed");
        })?;

    set_current_user(&session, &CurrentUser::from(&user))
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, user.username.as_str());

    tracing::info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(user))
}

/// End the session. Succeeds whether or not anyone was logged in.
pub async fn logout(OptionalAuth(user): OptionalAuth, session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    if let Some(user) = user {
        tracing::info!(user_id = %user.id, username = %user.username, "user logged out");
    }

    Ok(StatusCode::NO_CONTENT)
}
