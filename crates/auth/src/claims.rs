use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use remitdesk_core::{BranchId, SessionId, UserId};

use crate::{Identity, Role};

/// Session claims carried inside the signed artifact.
///
/// Field names on the wire follow JWT conventions (`sub`, `iat`, `exp`, `jti`)
/// so standard tooling can inspect a token. Timestamps are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (username in the identity store's namespace).
    pub sub: String,

    pub role: Role,

    /// Branch scope. `None` for directors only.
    pub branch_id: Option<BranchId>,

    #[serde(default)]
    pub user_id: Option<UserId>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    #[serde(rename = "jti")]
    pub session_id: SessionId,
}

impl SessionClaims {
    /// Claims for a fresh session, valid from `now` (truncated to the second)
    /// for `ttl`.
    pub fn for_identity(identity: &Identity, now: DateTime<Utc>, ttl: Duration) -> Self {
        let issued_at = now.with_nanosecond(0).unwrap_or(now);
        Self {
            sub: identity.subject().to_string(),
            role: identity.role(),
            branch_id: identity.branch_scope().cloned(),
            user_id: identity.user_id().cloned(),
            issued_at,
            expires_at: issued_at + ttl,
            session_id: SessionId::new(),
        }
    }

    /// Re-check the role/branch-scope pairing (used after decoding).
    pub fn check_scope(&self) -> Result<(), ClaimsError> {
        if self.sub.trim().is_empty() {
            return Err(ClaimsError::EmptySubject);
        }
        check_scope(self.role, self.branch_id.as_ref())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("subject is empty")]
    EmptySubject,

    #[error("role '{0}' requires a branch scope")]
    MissingScope(Role),

    #[error("role '{0}' must not carry a branch scope")]
    UnexpectedScope(Role),
}

/// Directors are unscoped; every other role is confined to exactly one branch.
pub fn check_scope(role: Role, branch_scope: Option<&BranchId>) -> Result<(), ClaimsError> {
    match (role.is_branch_scoped(), branch_scope) {
        (true, None) => Err(ClaimsError::MissingScope(role)),
        (false, Some(_)) => Err(ClaimsError::UnexpectedScope(role)),
        _ => Ok(()),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window against `now`.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::TokenIssuer::decode`], which calls this afterwards.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> Identity {
        Identity::new("branch", Role::BranchManager, BranchId::new("b1").ok(), None).unwrap()
    }

    #[test]
    fn claims_copy_role_and_scope_from_identity() {
        let now = Utc::now();
        let claims = SessionClaims::for_identity(&manager(), now, Duration::hours(24));

        assert_eq!(claims.role, Role::BranchManager);
        assert_eq!(claims.branch_id.as_ref().map(BranchId::as_str), Some("b1"));
        assert_eq!(claims.issued_at.nanosecond(), 0);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::hours(24));
        assert!(claims.check_scope().is_ok());
    }

    #[test]
    fn wire_format_uses_jwt_names_and_unix_seconds() {
        let claims = SessionClaims::for_identity(&manager(), Utc::now(), Duration::hours(24));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "branch");
        assert_eq!(json["role"], "branch_manager");
        assert_eq!(json["branch_id"], "b1");
        assert!(json["iat"].is_i64());
        assert_eq!(
            json["exp"].as_i64().unwrap() - json["iat"].as_i64().unwrap(),
            24 * 60 * 60
        );
        assert!(json["jti"].is_string());
    }

    #[test]
    fn validate_claims_time_window() {
        let now = Utc::now();
        let claims = SessionClaims::for_identity(&manager(), now, Duration::minutes(10));

        assert_eq!(validate_claims(&claims, claims.issued_at), Ok(()));
        assert_eq!(
            validate_claims(&claims, claims.issued_at - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims, claims.expires_at),
            Err(TokenValidationError::Expired)
        );

        let mut inverted = claims.clone();
        inverted.expires_at = inverted.issued_at;
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn check_scope_catches_tampered_pairings() {
        let mut claims = SessionClaims::for_identity(&manager(), Utc::now(), Duration::hours(1));
        claims.role = Role::Director;
        assert_eq!(
            claims.check_scope(),
            Err(ClaimsError::UnexpectedScope(Role::Director))
        );

        claims.role = Role::Employee;
        claims.branch_id = None;
        assert_eq!(claims.check_scope(), Err(ClaimsError::MissingScope(Role::Employee)));
    }
}
