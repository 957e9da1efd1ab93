// Storefront - API Core
//
// Phone + OTP authentication, JWT access/refresh tokens and role-gated
// access over a pluggable credential store.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
