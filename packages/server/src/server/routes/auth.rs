use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domains::auth::{self, TokenPair};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/otp
pub async fn request_otp_handler(
    State(state): State<AppState>,
    Json(body): Json<OtpRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth::request_otp(&body.phone_number, &state.deps).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "detail": "OTP sent" }))))
}

/// POST /auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = auth::login(&body.phone_number, &body.otp, &state.deps).await?;
    Ok(Json(pair))
}

/// POST /auth/refresh
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let access_token = auth::refresh(&body.refresh_token, &state.deps).await?;
    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}
