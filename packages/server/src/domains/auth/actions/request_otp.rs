//! Request OTP action

use chrono::Utc;
use tracing::{error, info};

use crate::common::auth::AuthError;
use crate::domains::user::models::{validate_phone, Principal, Role};
use crate::domains::user::store::StoreError;
use crate::kernel::ServerDeps;

/// Open a login challenge for `phone_number`.
///
/// Unknown numbers get a principal created on the fly (as admin when the
/// number is configured as one). The fresh code replaces any pending one,
/// then goes out through the SMS channel.
pub async fn request_otp(phone_number: &str, deps: &ServerDeps) -> Result<(), AuthError> {
    validate_phone(phone_number)?;

    find_or_create(phone_number, deps).await?;

    let code = deps.otp_generator.generate();
    deps.store
        .set_otp(phone_number, &code, Utc::now() + deps.otp_ttl)
        .await?;

    deps.sms.send_otp(phone_number, &code).await.map_err(|e| {
        error!(phone_number, error = %e, "Failed to deliver OTP");
        AuthError::Internal(e)
    })?;

    info!(phone_number, "OTP issued");
    Ok(())
}

async fn find_or_create(phone_number: &str, deps: &ServerDeps) -> Result<Principal, AuthError> {
    if let Some(existing) = deps.store.find_by_phone(phone_number).await? {
        return Ok(existing);
    }

    let role = if deps.is_admin_phone(phone_number) {
        Role::Admin
    } else {
        Role::User
    };

    match deps.store.create(phone_number, role).await {
        Ok(created) => {
            info!(phone_number, role = %created.role, "Created principal on OTP request");
            Ok(created)
        }
        // Lost a race with a concurrent request for the same number
        Err(StoreError::Duplicate(_)) => deps
            .store
            .find_by_phone(phone_number)
            .await?
            .ok_or(AuthError::UserNotFound),
        Err(e) => Err(e.into()),
    }
}
