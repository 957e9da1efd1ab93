//! Auth domain - phone + OTP login and token lifecycle
//!
//! Responsibilities:
//! - One-time passcode challenge/response
//! - Access/refresh JWT issuance and verification

pub mod actions;
pub mod jwt;

pub use actions::{login, refresh, request_otp};
pub use jwt::{Claims, JwtService, TokenKind, TokenPair};
