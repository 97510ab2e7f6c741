//! Credential verification.
//!
//! The login handler only sees the [`IdentityProvider`] trait, so the fixed
//! demo table can be replaced by a real credential store without touching the
//! gates or the issuer.

use serde::Serialize;
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;

use remitdesk_core::{BranchId, UserId};

use crate::claims::{ClaimsError, check_scope};
use crate::Role;

/// A verified identity: who the caller is and what they may act on.
///
/// Construction enforces the branch-scope rule, so an `Identity` can never
/// describe an unscoped branch manager or a branch-scoped director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    subject: String,
    role: Role,
    branch_scope: Option<BranchId>,
    user_id: Option<UserId>,
}

impl Identity {
    pub fn new(
        subject: impl Into<String>,
        role: Role,
        branch_scope: Option<BranchId>,
        user_id: Option<UserId>,
    ) -> Result<Self, ClaimsError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ClaimsError::EmptySubject);
        }
        check_scope(role, branch_scope.as_ref())?;
        Ok(Self {
            subject,
            role,
            branch_scope,
            user_id,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn branch_scope(&self) -> Option<&BranchId> {
        self.branch_scope.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}

/// Why a credential exchange failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Unknown user and wrong password are deliberately the same variant.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backing identity store could not answer.
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Pluggable identity lookup.
///
/// Implementations must be stateless from the caller's point of view: no
/// lockout, no side effects, safe to call concurrently.
pub trait IdentityProvider: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthFailure>;
}

#[derive(Debug, Clone)]
struct StaticAccount {
    username: String,
    password: String,
    identity: Identity,
}

/// Fixed in-process identity table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityTable {
    accounts: Vec<StaticAccount>,
}

impl StaticIdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three stock accounts, one per role.
    pub fn demo() -> Self {
        let b1 = BranchId::new("b1").ok();
        let user = |id: &str| UserId::new(id).ok();
        let mut table = Self::new();
        table.insert_unchecked("admin", "admin123", "admin", Role::Director, None, user("1"));
        table.insert_unchecked("branch", "branch123", "branch", Role::BranchManager, b1.clone(), user("2"));
        table.insert_unchecked("employee", "employee123", "employee", Role::Employee, b1, user("3"));
        table
    }

    /// Add an account. When two entries share credentials the first one wins.
    pub fn with_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        identity: Identity,
    ) -> Self {
        self.accounts.push(StaticAccount {
            username: username.into(),
            password: password.into(),
            identity,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn insert_unchecked(
        &mut self,
        username: &str,
        password: &str,
        subject: &str,
        role: Role,
        branch_scope: Option<BranchId>,
        user_id: Option<UserId>,
    ) {
        // Stock accounts are well-formed; a rejected one is simply left out.
        match Identity::new(subject, role, branch_scope, user_id) {
            Ok(identity) => self.accounts.push(StaticAccount {
                username: username.to_string(),
                password: password.to_string(),
                identity,
            }),
            Err(e) => tracing::error!(username, "skipping malformed stock account: {e}"),
        }
    }
}

impl IdentityProvider for StaticIdentityTable {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, AuthFailure> {
        // Walk every account and compare both fields each time so that the
        // work done does not depend on whether the username exists.
        let mut found: Option<&Identity> = None;
        for account in &self.accounts {
            let matched = credential_eq(&account.username, username) & credential_eq(&account.password, password);
            if bool::from(matched) && found.is_none() {
                found = Some(&account.identity);
            }
        }
        found.cloned().ok_or(AuthFailure::InvalidCredentials)
    }
}

/// Constant-time within equal lengths; a length mismatch is simply unequal.
fn credential_eq(stored: &str, offered: &str) -> Choice {
    stored.as_bytes().ct_eq(offered.as_bytes())
}
