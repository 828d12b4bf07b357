//! Signed bearer-token issuance and verification (HS256).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use userdir_core::AccountId;

use crate::Role;

/// Identity claims encoded into a bearer token at issuance.
///
/// A derived view of an account, frozen at issuance time: claims are not
/// refreshed mid-lifetime, so a role change or deletion only takes effect
/// once the token expires and the caller re-authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the account this token asserts.
    pub sub: AccountId,
    pub username: String,
    pub role: Role,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature mismatch or malformed structure.
    #[error("invalid token")]
    Invalid,

    /// Structurally valid and correctly signed, but past its expiry.
    #[error("token has expired")]
    Expired,

    /// Encoding the token failed.
    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// A freshly issued token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// The signing secret is injected at construction (loaded once at startup,
/// never rotated mid-process). Verification is stateless: there is no
/// revocation list, a token stays valid until expiry even if the underlying
/// account is deleted or demoted in the interim.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a token encoding the given identity, expiring `ttl` from now.
    pub fn issue(
        &self,
        account_id: AccountId,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: account_id,
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))?;

        tracing::debug!(account_id = %account_id, %expires_at, "issued bearer token");

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(TokenError::Expired),
            Err(_) => Err(TokenError::Invalid),
        }
    }
}
