// HTTP surface: thin axum glue over the auth and user actions
pub mod app;
pub mod error;
pub mod middleware;
pub mod routes;

pub use app::{build_app, build_router, build_server_deps, AppState};
pub use error::ApiError;
