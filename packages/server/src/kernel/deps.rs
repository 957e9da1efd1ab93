//! Server dependencies for auth actions (using traits for testability)
//!
//! `ServerDeps` is the single container handed to every action and to the
//! HTTP layer. All external services sit behind trait objects.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
use twilio::TwilioService;

use crate::common::auth::AccessGuard;
use crate::domains::auth::JwtService;
use crate::domains::user::store::CredentialStore;
use crate::kernel::{BaseOtpGenerator, BaseSmsService};

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_otp(&self, phone_number: &str, code: &str) -> Result<()> {
        self.0
            .send_otp(phone_number, code)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

/// Delivery channel for development: writes the code to the log.
pub struct LogSmsService;

#[async_trait]
impl BaseSmsService for LogSmsService {
    async fn send_otp(&self, phone_number: &str, code: &str) -> Result<()> {
        warn!(phone_number, code, "SMS delivery not configured; OTP written to log");
        Ok(())
    }
}

// =============================================================================
// OTP generation
// =============================================================================

pub struct RandomOtpGenerator;

impl BaseOtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        let code: u32 = rand::rng().random_range(0..1_000_000);
        format!("{:06}", code)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn CredentialStore>,
    pub jwt_service: Arc<JwtService>,
    pub sms: Arc<dyn BaseSmsService>,
    pub otp_generator: Arc<dyn BaseOtpGenerator>,
    /// How long an issued OTP stays valid
    pub otp_ttl: Duration,
    /// Phones created as (or promoted to) admin
    pub admin_phone_numbers: Vec<String>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        jwt_service: Arc<JwtService>,
        sms: Arc<dyn BaseSmsService>,
        otp_generator: Arc<dyn BaseOtpGenerator>,
        otp_ttl: Duration,
        admin_phone_numbers: Vec<String>,
    ) -> Self {
        info!(
            admin_count = admin_phone_numbers.len(),
            otp_ttl_secs = otp_ttl.num_seconds(),
            "Server dependencies ready"
        );
        Self {
            store,
            jwt_service,
            sms,
            otp_generator,
            otp_ttl,
            admin_phone_numbers,
        }
    }

    pub fn guard(&self) -> AccessGuard {
        AccessGuard::new(self.jwt_service.clone(), self.store.clone())
    }

    pub fn is_admin_phone(&self, phone_number: &str) -> bool {
        self.admin_phone_numbers.iter().any(|p| p == phone_number)
    }
}
