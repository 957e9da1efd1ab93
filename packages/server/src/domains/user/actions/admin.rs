use tracing::{info, warn};

use crate::common::auth::AuthError;
use crate::domains::user::models::{validate_phone, Principal, Role};
use crate::domains::user::store::StoreError;
use crate::kernel::ServerDeps;

/// Make `phone_number` an admin, creating the principal if needed.
pub async fn promote_to_admin(phone_number: &str, deps: &ServerDeps) -> Result<Principal, AuthError> {
    validate_phone(phone_number)?;

    let existing = match deps.store.find_by_phone(phone_number).await? {
        Some(p) => p,
        None => match deps.store.create(phone_number, Role::Admin).await {
            Ok(created) => {
                info!(phone_number, "Admin created");
                return Ok(created);
            }
            Err(StoreError::Duplicate(_)) => deps
                .store
                .find_by_phone(phone_number)
                .await?
                .ok_or(AuthError::UserNotFound)?,
            Err(e) => return Err(e.into()),
        },
    };

    if existing.is_admin() {
        return Ok(existing);
    }

    let promoted = deps.store.set_role(existing.id, Role::Admin).await?;
    info!(phone_number, "Principal promoted to admin");
    Ok(promoted)
}

/// Apply [`promote_to_admin`] to every configured admin phone.
///
/// Invalid entries are skipped with a warning so a typo cannot stop startup.
pub async fn bootstrap_admins(deps: &ServerDeps) -> Result<usize, AuthError> {
    let mut promoted = 0;
    for phone_number in &deps.admin_phone_numbers {
        match promote_to_admin(phone_number, deps).await {
            Ok(_) => promoted += 1,
            Err(AuthError::InvalidPhoneFormat) => {
                warn!(phone_number = %phone_number, "Skipping invalid admin phone number");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(promoted)
}
