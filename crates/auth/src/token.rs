//! Session artifact issuance and decoding (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;

use crate::claims::{ClaimsError, SessionClaims, TokenValidationError, validate_claims};
use crate::{Identity, SigningSecret};

/// Lifetime of every session artifact. There is no refresh: callers
/// re-authenticate once it elapses.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign session artifact: {0}")]
    Signing(String),

    #[error("malformed session artifact: {0}")]
    Malformed(String),

    #[error("session artifact signature mismatch")]
    BadSignature,

    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error(transparent)]
    Window(#[from] TokenValidationError),
}

impl TokenError {
    /// Whether the artifact was authentic but has simply run out.
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Window(TokenValidationError::Expired))
    }
}

/// A freshly signed artifact plus the claims it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Signs and verifies session artifacts with the process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(SESSION_TTL_SECS),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> Result<IssuedSession, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue with an explicit clock reading.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<IssuedSession, TokenError> {
        let claims = SessionClaims::for_identity(identity, now, self.ttl);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(IssuedSession { token, claims })
    }

    /// Verify signature, scope pairing and time window, in that order.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock, not the library's.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = data.claims;
        claims.check_scope()?;
        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
