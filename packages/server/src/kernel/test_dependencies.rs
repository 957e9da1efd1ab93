// TestDependencies - mock implementations for testing
//
// Provides mock collaborators and a ready-made ServerDeps over the in-memory
// credential store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{BaseOtpGenerator, BaseSmsService, ServerDeps};
use crate::config::JwtConfig;
use crate::domains::auth::JwtService;
use crate::domains::user::store::{CredentialStore, InMemoryCredentialStore};

// =============================================================================
// Mock SMS Service
// =============================================================================

/// A delivered OTP as seen by the mock gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentOtp {
    pub phone_number: String,
    pub code: String,
}

#[derive(Default)]
pub struct MockSmsService {
    sent: Arc<Mutex<Vec<SentOtp>>>,
    fail: bool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails, as if the gateway were down
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentOtp> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, phone_number: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.phone_number == phone_number)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_otp(&self, phone_number: &str, code: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("mock SMS gateway unavailable");
        }
        self.sent.lock().unwrap().push(SentOtp {
            phone_number: phone_number.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Fixed OTP Generator
// =============================================================================

/// Hands out queued codes in order, then repeats the fallback.
pub struct FixedOtpGenerator {
    queue: Mutex<VecDeque<String>>,
    fallback: String,
}

impl FixedOtpGenerator {
    pub fn new(code: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: code.to_string(),
        }
    }

    pub fn sequence(codes: &[&str]) -> Self {
        let fallback = codes.last().copied().unwrap_or("000000").to_string();
        Self {
            queue: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            fallback,
        }
    }
}

impl BaseOtpGenerator for FixedOtpGenerator {
    fn generate(&self) -> String {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        algorithm: Algorithm::HS256,
        issuer: "test_issuer".to_string(),
        access_ttl: Duration::days(1),
        refresh_ttl: Duration::weeks(1),
    }
}

/// Handles to the mocks behind a test `ServerDeps`
pub struct TestDependencies {
    pub deps: ServerDeps,
    pub store: Arc<InMemoryCredentialStore>,
    pub sms: Arc<MockSmsService>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_generator(FixedOtpGenerator::new("417203"))
    }

    pub fn with_generator(generator: FixedOtpGenerator) -> Self {
        Self::build(generator, MockSmsService::new(), Vec::new())
    }

    pub fn with_admins(admins: &[&str]) -> Self {
        Self::build(
            FixedOtpGenerator::new("417203"),
            MockSmsService::new(),
            admins.iter().map(|a| a.to_string()).collect(),
        )
    }

    pub fn with_sms(sms: MockSmsService) -> Self {
        Self::build(FixedOtpGenerator::new("417203"), sms, Vec::new())
    }

    fn build(generator: FixedOtpGenerator, sms: MockSmsService, admins: Vec<String>) -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());
        let sms = Arc::new(sms);
        let deps = ServerDeps::new(
            store.clone() as Arc<dyn CredentialStore>,
            Arc::new(JwtService::new(&test_jwt_config())),
            sms.clone(),
            Arc::new(generator),
            Duration::minutes(5),
            admins,
        );
        Self { deps, store, sms }
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
