use tracing::info;
use uuid::Uuid;

use crate::common::auth::AuthError;
use crate::domains::user::models::{validate_phone, Principal, Role};
use crate::kernel::ServerDeps;

/// Register a new principal with the default role.
pub async fn create_user(phone_number: &str, deps: &ServerDeps) -> Result<Principal, AuthError> {
    validate_phone(phone_number)?;
    let principal = deps.store.create(phone_number, Role::User).await?;
    info!(user_id = %principal.id, "User created");
    Ok(principal)
}

pub async fn list_users(deps: &ServerDeps) -> Result<Vec<Principal>, AuthError> {
    Ok(deps.store.list().await?)
}

pub async fn get_user(id: Uuid, deps: &ServerDeps) -> Result<Option<Principal>, AuthError> {
    Ok(deps.store.find_by_id(id).await?)
}

/// Remove a principal. Tokens already issued to it stop resolving.
pub async fn delete_user(id: Uuid, deps: &ServerDeps) -> Result<bool, AuthError> {
    let deleted = deps.store.delete(id).await?;
    if deleted {
        info!(user_id = %id, "User deleted");
    }
    Ok(deleted)
}
