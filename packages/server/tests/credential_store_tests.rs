//! Postgres credential store integration tests.
//!
//! Require Docker: cargo test -- --ignored

mod common;

use chrono::{Duration, Utc};
use common::TestHarness;
use storefront_core::domains::user::{CredentialStore, Role, StoreError};
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_find(ctx: &TestHarness) {
    let created = ctx.store.create("09100000001", Role::User).await.unwrap();
    assert_eq!(created.role, Role::User);
    assert!(created.otp.is_none());

    let by_phone = ctx.store.find_by_phone("09100000001").await.unwrap().unwrap();
    let by_id = ctx.store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_phone.id, created.id);
    assert_eq!(by_id.phone_number, "09100000001");
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_duplicate_phone_rejected(ctx: &TestHarness) {
    let first = ctx.store.create("09100000002", Role::Admin).await.unwrap();

    let err = ctx.store.create("09100000002", Role::User).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));

    let stored = ctx.store.find_by_phone("09100000002").await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.role, Role::Admin);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_concurrent_duplicate_creation(ctx: &TestHarness) {
    let (a, b) = tokio::join!(
        ctx.store.create("09111111111", Role::User),
        ctx.store.create("09111111111", Role::User),
    );
    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(StoreError::Duplicate(_))))
            .count(),
        1
    );

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM principals WHERE phone_number = '09111111111'")
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_clear_otp_single_use(ctx: &TestHarness) {
    ctx.store.create("09100000003", Role::User).await.unwrap();
    ctx.store
        .set_otp("09100000003", "123456", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    assert!(!ctx.store.clear_otp_if_matches("09100000003", "999999").await.unwrap());
    assert!(ctx.store.clear_otp_if_matches("09100000003", "123456").await.unwrap());
    assert!(!ctx.store.clear_otp_if_matches("09100000003", "123456").await.unwrap());

    let stored = ctx.store.find_by_phone("09100000003").await.unwrap().unwrap();
    assert!(stored.otp.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_clear_otp_expired(ctx: &TestHarness) {
    ctx.store.create("09100000004", Role::User).await.unwrap();
    ctx.store
        .set_otp("09100000004", "123456", Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    assert!(!ctx.store.clear_otp_if_matches("09100000004", "123456").await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_set_role_and_delete(ctx: &TestHarness) {
    let principal = ctx.store.create("09100000005", Role::User).await.unwrap();
    let promoted = ctx.store.set_role(principal.id, Role::Admin).await.unwrap();
    assert_eq!(promoted.role, Role::Admin);
    assert_eq!(promoted.joined_at, principal.joined_at);

    assert!(ctx.store.delete(principal.id).await.unwrap());
    assert!(ctx.store.find_by_id(principal.id).await.unwrap().is_none());
    assert!(!ctx.store.delete(Uuid::new_v4()).await.unwrap());
    assert!(matches!(
        ctx.store.set_role(principal.id, Role::Admin).await,
        Err(StoreError::NotFound)
    ));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_set_role_keeps_consumed_code_cleared(ctx: &TestHarness) {
    let principal = ctx.store.create("09100000006", Role::User).await.unwrap();
    ctx.store
        .set_otp("09100000006", "123456", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    assert!(ctx.store.clear_otp_if_matches("09100000006", "123456").await.unwrap());

    let promoted = ctx.store.set_role(principal.id, Role::Admin).await.unwrap();
    assert!(promoted.otp.is_none());
    assert!(!ctx.store.clear_otp_if_matches("09100000006", "123456").await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_set_otp_keeps_role(ctx: &TestHarness) {
    let principal = ctx.store.create("09100000007", Role::User).await.unwrap();
    ctx.store.set_role(principal.id, Role::Admin).await.unwrap();

    let updated = ctx
        .store
        .set_otp("09100000007", "123456", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.otp.as_deref(), Some("123456"));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore] // Requires Docker
async fn test_schema_rejects_malformed_phone(ctx: &TestHarness) {
    let result = ctx.store.create("12345", Role::User).await;
    assert!(matches!(result, Err(StoreError::InvalidPhone(_))));
}
