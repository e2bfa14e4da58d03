//! Identity token codec
//!
//! Turns a user id into an opaque, signed, expiring bearer token and back.
//! HS256 with a symmetric secret supplied through configuration; the codec
//! owns no global state, so rotation means constructing a new codec and
//! tests can run with distinct keys.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Token decode/issue failures
///
/// Decoding never panics on untrusted input; every failure path is typed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The signature does not verify against the configured secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// The token's expiry has passed
    #[error("Token has expired")]
    Expired,

    /// The token cannot be parsed as a signed claim
    #[error("Token is malformed")]
    Malformed,

    /// Signing a new token failed
    #[error("Token signing failed")]
    Signing,
}

/// The signed payload carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    user_id: i64,
    exp: i64,
}

/// A decoded, verified identity claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Encoder/decoder for identity tokens
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_secret(&config.token_secret, config.token_ttl_secs)
    }

    /// Build a codec from an explicit secret and lifetime
    pub fn with_secret(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `now >= expires_at` must reject; no clock grace.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Issue a token for a user, expiring one lifetime from now
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now() + self.ttl)
    }

    /// Issue a token with an explicit expiry timestamp
    pub(crate) fn issue_at(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims {
            user_id,
            exp: expires_at.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }

    /// Verify a token and recover its identity claim
    pub fn decode(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        let expires_at = DateTime::from_timestamp(data.claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(IdentityClaim {
            user_id: data.claims.user_id,
            expires_at,
        })
    }
}
