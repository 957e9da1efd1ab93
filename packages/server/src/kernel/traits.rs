// Infrastructure traits - abstractions over external collaborators so the
// auth actions can be exercised without network access.

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// SMS Service Trait (Infrastructure - OTP delivery)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Deliver an OTP code to a phone number
    async fn send_otp(&self, phone_number: &str, code: &str) -> Result<()>;
}

// =============================================================================
// OTP Generator Trait
// =============================================================================

pub trait BaseOtpGenerator: Send + Sync {
    /// Produce a fresh 6-digit code
    fn generate(&self) -> String;
}
