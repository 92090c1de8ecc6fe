pub mod cookie;
pub mod jwks;
pub mod oidc;

pub use oidc::{ClientSecrets, IdTokenClaims, IdentityProvider, OidcError, OidcProvider};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_SESSION_EXPIRY_HOURS;

/// Lifetime of the signed `state` round-tripped through the login challenge
pub const LOGIN_STATE_TTL_MINUTES: i64 = 10;

/// Claims stored in the session cookie after a completed login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Stable subject identifier issued by the identity provider
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Claims carried in the OIDC `state` parameter during a login challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginState {
    /// Path to return to once login completes
    pub next: String,
    /// Must match the nonce cookie set alongside the challenge
    pub nonce: String,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret not configured")]
    InvalidSecret,

    #[error("Token generation failed: {0}")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Session lifetime actually granted for a configured `expiry_hours`
pub fn session_hours(expiry_hours: u64) -> u64 {
    expiry_hours.clamp(1, MAX_SESSION_EXPIRY_HOURS)
}

impl SessionClaims {
    pub fn new(sub: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(session_hours(expiry_hours) as i64)).timestamp();

        Self {
            sub: sub.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

impl LoginState {
    pub fn new(next: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            next: next.into(),
            nonce: nonce.into(),
            exp: (Utc::now() + Duration::minutes(LOGIN_STATE_TTL_MINUTES)).timestamp(),
        }
    }
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(SessionError::TokenGeneration)
}

fn verify<T: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> Result<T, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<T>(token, &decoding_key, &Validation::default())
        .map_err(SessionError::InvalidToken)?;

    Ok(token_data.claims)
}

/// Sign a session token for `sub` valid for `expiry_hours`
pub fn issue_session(sub: &str, secret: &str, expiry_hours: u64) -> Result<String, SessionError> {
    sign(&SessionClaims::new(sub, expiry_hours), secret)
}

pub fn verify_session(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    verify(token, secret)
}

pub fn issue_login_state(state: &LoginState, secret: &str) -> Result<String, SessionError> {
    sign(state, secret)
}

pub fn verify_login_state(token: &str, secret: &str) -> Result<LoginState, SessionError> {
    verify(token, secret)
}
