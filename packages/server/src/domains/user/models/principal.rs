use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::auth::AuthError;

lazy_static! {
    // "09" followed by exactly nine digits
    static ref PHONE_REGEX: Regex = Regex::new(r"^09[0-9]{9}$").unwrap();

    static ref OTP_REGEX: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "principal_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Principal {
    pub id: Uuid,
    pub phone_number: String,
    pub role: Role,
    /// Pending login challenge, if any
    #[serde(skip_serializing, default)]
    pub otp: Option<String>,
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}

impl Principal {
    /// Build a fresh principal. The phone number must already be validated.
    pub fn new(phone_number: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: phone_number.into(),
            role,
            otp: None,
            otp_expires_at: None,
            joined_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// True if `candidate` equals the stored code and it has not expired at `now`.
    pub fn otp_matches(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        match (&self.otp, self.otp_expires_at) {
            (Some(stored), Some(expires_at)) => stored == candidate && expires_at > now,
            (Some(stored), None) => stored == candidate,
            (None, _) => false,
        }
    }
}

/// Public view of a principal, as returned to any authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub phone_number: String,
    pub joined_at: DateTime<Utc>,
}

/// Admin view of a principal; adds the role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserPublic {
    pub id: Uuid,
    pub phone_number: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl From<&Principal> for UserPublic {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            phone_number: p.phone_number.clone(),
            joined_at: p.joined_at,
        }
    }
}

impl From<&Principal> for AdminUserPublic {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            phone_number: p.phone_number.clone(),
            role: p.role,
            joined_at: p.joined_at,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

pub fn validate_phone(phone_number: &str) -> Result<(), AuthError> {
    if PHONE_REGEX.is_match(phone_number) {
        Ok(())
    } else {
        Err(AuthError::InvalidPhoneFormat)
    }
}

/// Rejects anything that is not exactly six ASCII digits.
pub fn validate_otp_shape(otp: &str) -> Result<(), AuthError> {
    if OTP_REGEX.is_match(otp) {
        Ok(())
    } else {
        Err(AuthError::InvalidOtp)
    }
}
