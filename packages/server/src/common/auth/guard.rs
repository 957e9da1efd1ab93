use std::sync::Arc;
use tracing::debug;

use super::AuthError;
use crate::domains::auth::JwtService;
use crate::domains::user::models::{Principal, Role};
use crate::domains::user::store::CredentialStore;

/// Resolves bearer tokens to principals.
///
/// Tokens are not revoked when an account is deleted or its role changes:
/// the principal is re-read from the store on every call, so a deleted
/// account fails with `UserNotFound` and a demoted admin loses access
/// immediately, but an otherwise valid token keeps verifying until it expires.
#[derive(Clone)]
pub struct AccessGuard {
    jwt_service: Arc<JwtService>,
    store: Arc<dyn CredentialStore>,
}

impl AccessGuard {
    pub fn new(jwt_service: Arc<JwtService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { jwt_service, store }
    }

    pub async fn current_principal(&self, access_token: &str) -> Result<Principal, AuthError> {
        let claims = self.jwt_service.verify(access_token)?;
        let phone_number = claims.subject()?;

        match self.store.find_by_phone(phone_number).await? {
            Some(principal) => Ok(principal),
            None => {
                debug!(phone_number, "Token subject has no principal");
                Err(AuthError::UserNotFound)
            }
        }
    }
}

/// Gate for administrative operations.
pub fn require_admin(principal: Principal) -> Result<Principal, AuthError> {
    match principal.role {
        Role::Admin => Ok(principal),
        Role::User => Err(AuthError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::TokenKind;
    use crate::kernel::TestDependencies;
    use chrono::Duration;

    #[tokio::test]
    async fn test_current_principal_resolves_subject() {
        let test = TestDependencies::new();
        let created = test.store.create("09123456789", Role::User).await.unwrap();
        let token = test.deps.jwt_service.issue_access("09123456789").unwrap();

        let principal = test.deps.guard().current_principal(&token).await.unwrap();
        assert_eq!(principal, created);
    }

    #[tokio::test]
    async fn test_current_principal_invalid_token() {
        let test = TestDependencies::new();
        let result = test.deps.guard().current_principal("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_current_principal_expired_token() {
        let test = TestDependencies::new();
        test.store.create("09123456789", Role::User).await.unwrap();
        let token = test
            .deps
            .jwt_service
            .issue("09123456789", TokenKind::Access, Duration::seconds(-10))
            .unwrap();

        let result = test.deps.guard().current_principal(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_current_principal_deleted_account() {
        let test = TestDependencies::new();
        let created = test.store.create("09123456789", Role::User).await.unwrap();
        let token = test.deps.jwt_service.issue_access("09123456789").unwrap();
        test.store.delete(created.id).await.unwrap();

        let result = test.deps.guard().current_principal(&token).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[test]
    fn test_require_admin() {
        let user = Principal::new("09123456789", Role::User);
        assert!(matches!(require_admin(user), Err(AuthError::Forbidden)));

        let admin = Principal::new("09111111111", Role::Admin);
        assert_eq!(require_admin(admin.clone()).unwrap(), admin);
    }
}
