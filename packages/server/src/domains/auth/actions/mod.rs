//! Auth domain actions - business logic functions
//!
//! Actions are async functions called from the HTTP handlers with the shared
//! `ServerDeps`.

mod login;
mod refresh;
mod request_otp;

pub use login::login;
pub use refresh::refresh;
pub use request_otp::request_otp;
