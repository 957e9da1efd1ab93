use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::domains::user::models::{validate_phone, Principal, Role};

/// In-process store keyed by phone number.
///
/// Every mutation holds the write lock for its whole read-modify-write, which
/// gives the same uniqueness and single-use OTP guarantees as the database.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    principals: RwLock<HashMap<String, Principal>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Principal>, StoreError> {
        Ok(self.principals.read().await.get(phone_number).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        let principals = self.principals.read().await;
        Ok(principals.values().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Principal>, StoreError> {
        let mut all: Vec<Principal> = self.principals.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn create(&self, phone_number: &str, role: Role) -> Result<Principal, StoreError> {
        // Mirrors the phone CHECK constraint on the principals table
        if validate_phone(phone_number).is_err() {
            return Err(StoreError::InvalidPhone(phone_number.to_string()));
        }
        let mut principals = self.principals.write().await;
        if principals.contains_key(phone_number) {
            return Err(StoreError::Duplicate(phone_number.to_string()));
        }
        let principal = Principal::new(phone_number, role);
        principals.insert(phone_number.to_string(), principal.clone());
        Ok(principal)
    }

    async fn set_otp(
        &self,
        phone_number: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Principal, StoreError> {
        let mut principals = self.principals.write().await;
        let stored = principals
            .get_mut(phone_number)
            .ok_or(StoreError::NotFound)?;
        stored.otp = Some(otp.to_string());
        stored.otp_expires_at = Some(expires_at);
        Ok(stored.clone())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Principal, StoreError> {
        let mut principals = self.principals.write().await;
        let stored = principals
            .values_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        stored.role = role;
        Ok(stored.clone())
    }

    async fn clear_otp_if_matches(&self, phone_number: &str, otp: &str) -> Result<bool, StoreError> {
        let mut principals = self.principals.write().await;
        match principals.get_mut(phone_number) {
            Some(p) if p.otp_matches(otp, Utc::now()) => {
                p.otp = None;
                p.otp_expires_at = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut principals = self.principals.write().await;
        let before = principals.len();
        principals.retain(|_, p| p.id != id);
        Ok(principals.len() < before)
    }
}
