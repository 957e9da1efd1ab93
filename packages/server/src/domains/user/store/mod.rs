//! Credential store - durable keyed storage for principals.
//!
//! The auth core only talks to storage through [`CredentialStore`]. Two
//! implementations ship with the crate: Postgres for production and an
//! in-memory map for tests and local runs.

mod memory;
mod postgres;

pub use memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Principal, Role};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("principal with phone number {0} already exists")]
    Duplicate(String),

    #[error("invalid phone number {0}")]
    InvalidPhone(String),

    #[error("principal not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Principal>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError>;

    /// All principals, oldest first
    async fn list(&self) -> Result<Vec<Principal>, StoreError>;

    /// Insert a new principal. Fails with `Duplicate` and leaves existing
    /// state untouched if the phone number is taken.
    async fn create(&self, phone_number: &str, role: Role) -> Result<Principal, StoreError>;

    /// Replace the pending OTP of `phone_number`. Touches only the OTP columns.
    async fn set_otp(
        &self,
        phone_number: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Principal, StoreError>;

    /// Change the role of principal `id`. Touches only the role column.
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Principal, StoreError>;

    /// Atomically clear the stored OTP if it equals `otp` and has not expired.
    ///
    /// Returns true only for the single caller whose check succeeded.
    async fn clear_otp_if_matches(&self, phone_number: &str, otp: &str) -> Result<bool, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
