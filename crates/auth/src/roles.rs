use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Staff role carried by every session.
///
/// The set is closed: a session artifact naming anything else fails to decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Head office. Sees every branch, never branch-scoped.
    Director,
    /// Runs a single branch.
    BranchManager,
    /// Counter staff at a single branch.
    Employee,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Director, Role::BranchManager, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Director => "director",
            Role::BranchManager => "branch_manager",
            Role::Employee => "employee",
        }
    }

    /// Whether identities with this role must be confined to one branch.
    pub fn is_branch_scoped(&self) -> bool {
        !matches!(self, Role::Director)
    }

    /// Landing page after a successful login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Director => "/dashboard/director",
            Role::BranchManager => "/branch-dashboard",
            Role::Employee => "/money-transfer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_serde_and_from_str() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn parsing_is_exact() {
        assert!("Director".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
        assert!(" director".parse::<Role>().is_err());
    }

    #[test]
    fn only_director_is_unscoped() {
        assert!(!Role::Director.is_branch_scoped());
        assert!(Role::BranchManager.is_branch_scoped());
        assert!(Role::Employee.is_branch_scoped());
    }
}
