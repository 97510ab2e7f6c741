use thiserror::Error;

use remitdesk_core::BranchId;

use crate::{Role, SessionClaims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("branch '{target}' is outside this session's branch '{scope}'")]
    OutsideBranch { scope: BranchId, target: BranchId },

    #[error("role '{0}' is branch-scoped but the session carries no branch")]
    MissingScope(Role),
}

/// Authorize an action against `target` branch.
///
/// - Directors may act on any branch.
/// - Everyone else may act only on their own branch.
/// - No IO, no panics.
pub fn authorize_branch(
    role: Role,
    scope: Option<&BranchId>,
    target: &BranchId,
) -> Result<(), ScopeError> {
    if !role.is_branch_scoped() {
        return Ok(());
    }
    match scope {
        Some(scope) if scope == target => Ok(()),
        Some(scope) => Err(ScopeError::OutsideBranch {
            scope: scope.clone(),
            target: target.clone(),
        }),
        None => Err(ScopeError::MissingScope(role)),
    }
}

impl SessionClaims {
    pub fn authorize_branch(&self, target: &BranchId) -> Result<(), ScopeError> {
        authorize_branch(self.role, self.branch_id.as_ref(), target)
    }
}
