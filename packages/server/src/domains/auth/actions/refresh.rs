//! Refresh action - mints a new access token from a refresh token

use tracing::debug;

use crate::common::auth::AuthError;
use crate::kernel::ServerDeps;

/// Issue a fresh access token for the subject of `refresh_token`.
///
/// Access tokens are refused here with `WrongTokenType`.
pub async fn refresh(refresh_token: &str, deps: &ServerDeps) -> Result<String, AuthError> {
    let claims = deps.jwt_service.verify_refresh(refresh_token)?;
    let subject = claims.subject()?;

    debug!(phone_number = subject, "Refreshing access token");
    deps.jwt_service.issue_access(subject)
}
