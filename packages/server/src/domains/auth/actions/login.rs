//! Login action - exchanges phone + OTP for a token pair

use tracing::{debug, info};

use crate::common::auth::AuthError;
use crate::domains::auth::jwt::TokenPair;
use crate::domains::user::models::validate_otp_shape;
use crate::kernel::ServerDeps;

/// Consume the pending OTP for `phone_number` and issue access + refresh tokens.
///
/// The check and the clear happen in one conditional store update, so a code
/// can succeed at most once even under concurrent requests. A wrong code
/// leaves the pending one in place for a retry.
pub async fn login(phone_number: &str, otp: &str, deps: &ServerDeps) -> Result<TokenPair, AuthError> {
    validate_otp_shape(otp)?;

    if deps.store.find_by_phone(phone_number).await?.is_none() {
        debug!(phone_number, "Login for unknown principal");
        return Err(AuthError::UserNotFound);
    }

    if !deps.store.clear_otp_if_matches(phone_number, otp).await? {
        debug!(phone_number, "OTP mismatch, expired or already used");
        return Err(AuthError::InvalidOtp);
    }

    let access_token = deps.jwt_service.issue_access(phone_number)?;
    let refresh_token = deps.jwt_service.issue_refresh(phone_number)?;

    info!(phone_number, "Login succeeded");
    Ok(TokenPair::bearer(access_token, refresh_token))
}
