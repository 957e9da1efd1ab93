use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::common::auth::AuthError;
use crate::config::JwtConfig;

/// Marker value carried in the `type` claim of refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (phone number). Optional on decode so a token without it can
    /// be reported as `PrincipalMissing` instead of a generic decode failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
    /// Present only on refresh tokens
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    pub fn kind(&self) -> TokenKind {
        match self.token_type.as_deref() {
            Some(REFRESH_TOKEN_TYPE) => TokenKind::Refresh,
            _ => TokenKind::Access,
        }
    }

    pub fn subject(&self) -> Result<&str, AuthError> {
        self.sub.as_deref().ok_or(AuthError::PrincipalMissing)
    }
}

/// Access + refresh token pair handed out at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// JWT Service - the only holder of the signing secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
            issuer: config.issuer.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, kind: TokenKind, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            token_type: match kind {
                TokenKind::Access => None,
                TokenKind::Refresh => Some(REFRESH_TOKEN_TYPE.to_string()),
            },
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.into()))
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, TokenKind::Access, self.access_ttl)
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Verify signature, algorithm, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = %e, "Rejected token");
                AuthError::InvalidToken
            })
    }

    /// Like [`verify`](Self::verify), but only accepts refresh tokens.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.kind() != TokenKind::Refresh {
            return Err(AuthError::WrongTokenType);
        }
        Ok(claims)
    }
}
