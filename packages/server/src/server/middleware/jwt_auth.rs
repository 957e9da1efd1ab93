use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::common::auth::{require_admin, AuthError};
use crate::domains::user::models::Principal;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Principal resolved from the `Authorization` header.
///
/// Rejects with 401 when the header is missing, the token does not verify or
/// its subject no longer exists.
#[derive(Clone, Debug)]
pub struct CurrentPrincipal(pub Principal);

/// Like [`CurrentPrincipal`], additionally requiring the admin role (403 otherwise).
#[derive(Clone, Debug)]
pub struct AdminPrincipal(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts).ok_or(AuthError::AuthenticationRequired)?;
        let principal = state.deps.guard().current_principal(token).await?;
        debug!(user_id = %principal.id, role = %principal.role, "Authenticated request");
        Ok(CurrentPrincipal(principal))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentPrincipal(principal) = CurrentPrincipal::from_request_parts(parts, state).await?;
        Ok(AdminPrincipal(require_admin(principal)?))
    }
}

/// Extract the token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    let auth_header = parts.headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
