//! Bearer token issuance and verification (HS256 JWT)

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{Error, Result};

use super::state::AppState;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration (Unix seconds)
    pub exp: u64,
}

/// Signs and verifies access tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Sign with another HMAC algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_minutes).with_algorithm(config.jwt_algorithm)
    }

    /// Issue a token for `subject`
    pub fn issue(&self, subject: &str) -> Result<String> {
        let exp = (Utc::now() + self.ttl).timestamp().max(0) as u64;
        let claims = Claims {
            sub: subject.to_string(),
            exp,
        };
        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?)
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(self.algorithm))
            .map(|data| data.claims.sub)
            .map_err(|e| Error::Unauthorized(e.to_string()))
    }
}

/// Authenticated caller; `None` when auth is disabled
#[derive(Debug, Clone)]
pub struct AuthUser(pub Option<String>);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(issuer) = state.token_issuer() else {
            return Ok(AuthUser(None));
        };

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
            .ok_or_else(|| Error::Unauthorized("missing bearer token".to_string()))?;

        issuer.verify(token.trim()).map(|sub| AuthUser(Some(sub)))
    }
}
