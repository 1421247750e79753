//! User endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::{ApiResult, ValidatedJson};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, LoginRequest, LoginResponse, UserView};
use crate::AppState;

/// Body returned after creating a user.
#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub id: String,
    pub username: String,
}

/// POST /api/blog/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserCreatedResponse>)> {
    let user = state.store.create_user(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// GET /api/blog/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserView>> {
    state
        .store
        .get_user(&id)
        .await
        .map(|user| Json(UserView::from(&user)))
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
}

/// POST /api/blog/login - Trade user credentials for the admin token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let username = request.username.trim();
    if !state.store.verify_user(username, &request.password).await {
        tracing::warn!("Failed login for {}", username);
        return Err(invalid_credentials());
    }
    let user = state
        .store
        .get_user_by_username(username)
        .await
        .ok_or_else(invalid_credentials)?;

    tracing::info!("User {} logged in", user.username);
    Ok(Json(LoginResponse {
        token: state.config.admin_token.clone(),
        user: UserView::from(&user),
    }))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}
