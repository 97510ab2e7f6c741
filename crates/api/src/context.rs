use chrono::{DateTime, Utc};

use remitdesk_auth::{Role, SessionClaims};
use remitdesk_core::{BranchId, SessionId, UserId};

/// Verified session for an API request (from the bearer artifact).
///
/// Immutable; inserted by the bearer middleware and read by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    claims: SessionClaims,
}

impl SessionContext {
    pub fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn branch_scope(&self) -> Option<&BranchId> {
        self.claims.branch_id.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.claims.user_id.as_ref()
    }

    pub fn session_id(&self) -> SessionId {
        self.claims.session_id
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at
    }
}
