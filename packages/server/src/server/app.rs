//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::domains::user::store::CredentialStore;
use crate::kernel::{
    BaseSmsService, LogSmsService, RandomOtpGenerator, ServerDeps, TwilioAdapter,
};
use crate::server::routes::{
    admin_index_handler, create_user_handler, delete_user_handler, get_user_handler,
    health_handler, list_users_handler, login_handler, me_handler, promote_handler,
    refresh_handler, request_otp_handler, root_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

impl AppState {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps: Arc::new(deps),
        }
    }
}

/// Wire the production collaborators around `store`.
pub fn build_server_deps(config: &Config, store: Arc<dyn CredentialStore>) -> ServerDeps {
    let sms: Arc<dyn BaseSmsService> = match &config.twilio {
        Some(twilio) => Arc::new(TwilioAdapter::new(Arc::new(TwilioService::new(
            TwilioOptions {
                account_sid: twilio.account_sid.clone(),
                auth_token: twilio.auth_token.clone(),
                from_number: twilio.from_number.clone(),
            },
        )))),
        None => {
            warn!("Twilio is not configured; OTP codes will only be written to the log");
            Arc::new(LogSmsService)
        }
    };

    ServerDeps::new(
        store,
        Arc::new(JwtService::new(&config.jwt)),
        sms,
        Arc::new(RandomOtpGenerator),
        config.otp_ttl,
        config.admin_phone_numbers.clone(),
    )
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/otp", post(request_otp_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/refresh", post(refresh_handler))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/user", get(list_users_handler))
        .route("/user/me", get(me_handler))
        .route("/user/create", post(create_user_handler))
        .route("/user/:id", get(get_user_handler).delete(delete_user_handler))
        .route("/admin", get(admin_index_handler))
        .route("/admin/users/:phone/promote", post(promote_handler))
}

/// Routes and state without the transport layers (rate limit, CORS, tracing).
pub fn build_router(state: AppState) -> Router {
    auth_routes().merge(api_routes()).with_state(state)
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, config: &Config) -> Result<Router> {
    let state = AppState::new(deps);

    // OTP endpoints: 1 request per 2 seconds per IP, burst of 5
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(5)
            .use_headers() // Report x-ratelimit-* headers on responses
            .finish()
            .ok_or_else(|| anyhow!("invalid rate limiter configuration"))?,
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let app = auth_routes()
        .layer(rate_limit_layer)
        .merge(api_routes())
        .with_state(state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(tower_http::cors::Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
