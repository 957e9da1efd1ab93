// HTTP routes
pub mod admin;
pub mod auth;
pub mod health;
pub mod users;

pub use admin::*;
pub use auth::*;
pub use health::*;
pub use users::*;
