//! User domain actions - account management on top of the credential store

mod admin;
mod users;

pub use admin::{bootstrap_admins, promote_to_admin};
pub use users::{create_user, delete_user, get_user, list_users};
