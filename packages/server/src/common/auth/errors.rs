use axum::http::StatusCode;
use thiserror::Error;

use crate::domains::user::store::StoreError;

/// Authentication and authorization failures.
///
/// Every variant is terminal for the request that produced it. The HTTP layer
/// relies on the variant to pick between 400, 401 and 403, so callers must
/// propagate these unchanged rather than folding them into `Internal`.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid phone number format")]
    InvalidPhoneFormat,

    #[error("User already exists")]
    DuplicatePrincipal,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid token type")]
    WrongTokenType,

    #[error("Invalid token")]
    PrincipalMissing,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidPhoneFormat | AuthError::InvalidOtp | AuthError::DuplicatePrincipal => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidToken
            | AuthError::UserNotFound
            | AuthError::WrongTokenType
            | AuthError::PrincipalMissing
            | AuthError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => AuthError::DuplicatePrincipal,
            StoreError::InvalidPhone(_) => AuthError::InvalidPhoneFormat,
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}
