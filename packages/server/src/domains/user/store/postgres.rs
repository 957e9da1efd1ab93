use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::domains::user::models::{Principal, Role};

const PRINCIPAL_COLUMNS: &str = "id, phone_number, role, otp, otp_expires_at, joined_at";

/// Postgres-backed store. Uniqueness of `phone_number` is enforced by the
/// table's unique constraint, OTP consumption by a conditional UPDATE.
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_insert_error(err: sqlx::Error, phone_number: &str) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(phone_number.to_string())
        }
        // New rows carry no OTP, so the only CHECK an insert can trip is the phone format
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            StoreError::InvalidPhone(phone_number.to_string())
        }
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Principal>, StoreError> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {} FROM principals WHERE phone_number = $1",
            PRINCIPAL_COLUMNS
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {} FROM principals WHERE id = $1",
            PRINCIPAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    async fn list(&self) -> Result<Vec<Principal>, StoreError> {
        let principals = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {} FROM principals ORDER BY joined_at, id",
            PRINCIPAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(principals)
    }

    async fn create(&self, phone_number: &str, role: Role) -> Result<Principal, StoreError> {
        let principal = Principal::new(phone_number, role);
        let created = sqlx::query_as::<_, Principal>(&format!(
            r#"
            INSERT INTO principals (id, phone_number, role, joined_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PRINCIPAL_COLUMNS
        ))
        .bind(principal.id)
        .bind(&principal.phone_number)
        .bind(principal.role)
        .bind(principal.joined_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, phone_number))?;
        Ok(created)
    }

    async fn set_otp(
        &self,
        phone_number: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Principal, StoreError> {
        sqlx::query_as::<_, Principal>(&format!(
            r#"
            UPDATE principals
            SET otp = $2, otp_expires_at = $3
            WHERE phone_number = $1
            RETURNING {}
            "#,
            PRINCIPAL_COLUMNS
        ))
        .bind(phone_number)
        .bind(otp)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Principal, StoreError> {
        sqlx::query_as::<_, Principal>(&format!(
            "UPDATE principals SET role = $2 WHERE id = $1 RETURNING {}",
            PRINCIPAL_COLUMNS
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn clear_otp_if_matches(&self, phone_number: &str, otp: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE principals
            SET otp = NULL, otp_expires_at = NULL
            WHERE phone_number = $1
              AND otp = $2
              AND (otp_expires_at IS NULL OR otp_expires_at > NOW())
            "#,
        )
        .bind(phone_number)
        .bind(otp)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM principals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
