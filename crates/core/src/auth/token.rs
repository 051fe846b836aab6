//! Signed-token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. Verification
//! accepts HS256 only, so a token whose header names any other algorithm is
//! rejected before its claims are looked at.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Claims embedded in every access and refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user's opaque id.
    pub id: String,
    pub login: String,
    /// Role code (see [`Role::code`]).
    pub role: i16,
    pub typ: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// The flow a token was issued for. An access token cannot be refreshed and
/// a refresh token cannot authorize requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity a token is issued for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub id: &'a str,
    pub login: &'a str,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token has expired")]
    Expired,

    #[error("token claims are malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token was issued for another use")]
    WrongKind,
}

/// Signs and verifies tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256];
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a `kind` token for `subject` expiring `ttl` from now.
    pub fn issue(
        &self,
        subject: TokenSubject<'_>,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            id: subject.id.to_string(),
            login: subject.login.to_string(),
            role: subject.role.code(),
            typ: kind,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm, and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                _ => TokenError::InvalidSignature,
            })
    }

    /// [`verify`](Self::verify), then require the token to be of `kind`.
    pub fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.typ != kind {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }
}
