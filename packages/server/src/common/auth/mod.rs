//! Authorization primitives shared by every domain
//!
//! ```rust,ignore
//! let principal = deps.guard().current_principal(token).await?;
//! let admin = require_admin(principal)?;
//! ```

mod errors;
mod guard;

pub use errors::AuthError;
pub use guard::{require_admin, AccessGuard};
