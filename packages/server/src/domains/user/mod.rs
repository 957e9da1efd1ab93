//! User domain - principals, their storage and account management

pub mod actions;
pub mod models;
pub mod store;

pub use models::{Principal, Role};
pub use store::{CredentialStore, InMemoryCredentialStore, PostgresCredentialStore, StoreError};
