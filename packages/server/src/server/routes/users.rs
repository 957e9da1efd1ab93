use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domains::user::actions;
use crate::domains::user::models::{AdminUserPublic, UserPublic};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{AdminPrincipal, CurrentPrincipal};

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub phone_number: String,
}

/// GET /user/me
pub async fn me_handler(CurrentPrincipal(principal): CurrentPrincipal) -> Json<AdminUserPublic> {
    Json(AdminUserPublic::from(&principal))
}

/// GET /user (admin)
pub async fn list_users_handler(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> Result<Json<Vec<AdminUserPublic>>, ApiError> {
    let users = actions::list_users(&state.deps).await?;
    Ok(Json(users.iter().map(AdminUserPublic::from).collect()))
}

/// GET /user/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    CurrentPrincipal(_caller): CurrentPrincipal,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = actions::get_user(user_id, &state.deps)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserPublic::from(&user)))
}

/// POST /user/create
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    let user = actions::create_user(&body.phone_number, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(UserPublic::from(&user))))
}

/// DELETE /user/:id (admin)
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if actions::delete_user(user_id, &state.deps).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("User not found"))
    }
}
