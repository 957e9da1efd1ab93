use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::domains::user::actions;
use crate::domains::user::models::AdminUserPublic;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::AdminPrincipal;

/// GET /admin
pub async fn admin_index_handler(AdminPrincipal(_admin): AdminPrincipal) -> Json<Value> {
    Json(json!({ "message": "Welcome to the admin panel!" }))
}

/// POST /admin/users/:phone/promote
pub async fn promote_handler(
    State(state): State<AppState>,
    AdminPrincipal(admin): AdminPrincipal,
    Path(phone_number): Path<String>,
) -> Result<Json<AdminUserPublic>, ApiError> {
    tracing::info!(by = %admin.id, phone_number = %phone_number, "Promotion requested");
    let promoted = actions::promote_to_admin(&phone_number, &state.deps).await?;
    Ok(Json(AdminUserPublic::from(&promoted)))
}
