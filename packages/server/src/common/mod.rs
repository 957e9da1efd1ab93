pub mod auth;

pub use auth::{require_admin, AccessGuard, AuthError};
