pub mod password;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::models::User;

pub use password::{hash_password, verify_password};

/// Claims carried by a login token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Expiry saturates instead of overflowing for absurd lifetimes
    pub fn new(user: &User, ttl_secs: u64) -> Self {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);

        Self {
            username: user.username.clone(),
            id: user.id,
            iat,
            exp: iat.saturating_add(ttl),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("token missing")]
    MissingToken,

    #[error("token invalid")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("user not found")]
    UnknownUser,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

pub fn issue_token(user: &User, security: &SecurityConfig) -> Result<String, AuthError> {
    sign_claims(&Claims::new(user, security.token_ttl_secs), &security.jwt_secret)
}

pub fn sign_claims(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Signing("secret not configured".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verifies signature and expiry; expiry is checked with no leeway
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
}
