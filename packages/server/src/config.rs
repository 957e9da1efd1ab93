use anyhow::{bail, Context, Result};
use chrono::Duration;
use dotenvy::dotenv;
use jsonwebtoken::Algorithm;
use std::env;

/// Token signing settings. Built once at startup and shared read-only.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[redacted]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub otp_ttl: Duration,
    /// SMS delivery; `None` falls back to logging the code
    pub twilio: Option<TwilioConfig>,
    pub admin_phone_numbers: Vec<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            algorithm: parse_algorithm(
                &env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
            )?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront".to_string()),
            access_ttl: Duration::minutes(
                env_number("ACCESS_TOKEN_TTL_MINUTES", 24 * 60)?,
            ),
            refresh_ttl: Duration::minutes(
                env_number("REFRESH_TOKEN_TTL_MINUTES", 7 * 24 * 60)?,
            ),
        };
        if jwt.secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 bytes");
        }

        let twilio = match (
            env::var("TWILIO_ACCOUNT_SID"),
            env::var("TWILIO_AUTH_TOKEN"),
            env::var("TWILIO_FROM_NUMBER"),
        ) {
            (Ok(account_sid), Ok(auth_token), Ok(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt,
            otp_ttl: Duration::seconds(env_number("OTP_TTL_SECONDS", 300)?),
            twilio,
            admin_phone_numbers: parse_list(&env::var("ADMIN_PHONE_NUMBERS").unwrap_or_default()),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn env_number(name: &str, default: i64) -> Result<i64> {
    match env::var(name) {
        Ok(raw) => {
            let value: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a valid number", name))?;
            if value <= 0 {
                bail!("{} must be positive", name);
            }
            Ok(value)
        }
        Err(_) => Ok(default),
    }
}

/// Only the symmetric HMAC family is accepted; the secret is a shared key.
pub fn parse_algorithm(raw: &str) -> Result<Algorithm> {
    let algorithm: Algorithm = raw
        .trim()
        .parse()
        .with_context(|| format!("JWT_ALGORITHM {:?} is not a known algorithm", raw))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => bail!("JWT_ALGORITHM {:?} is not a symmetric HMAC algorithm", other),
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
