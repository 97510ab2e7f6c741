//! Route classification for the edge gate.
//!
//! Prefixes are compared segment by segment, never as raw strings:
//! `/dashboard/branches` covers `/dashboard/branches` and
//! `/dashboard/branches/7`, but not `/dashboard/branches-archive`.
//! When several prefixes match, the one with the most segments wins.
//!
//! Segments are taken literally. The router dispatches on the raw request
//! path, so `.` and `..` are never resolved here: `/branch-dashboard/..`
//! reaches a branch-dashboard handler and must be classified as such.

use serde::Serialize;
use thiserror::Error;

use crate::Role;

/// Access class of a path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    DirectorOnly,
    BranchManagerOnly,
    Public,
}

impl RouteAccess {
    pub fn required_role(&self) -> Option<Role> {
        match self {
            RouteAccess::DirectorOnly => Some(Role::Director),
            RouteAccess::BranchManagerOnly => Some(Role::BranchManager),
            RouteAccess::Public => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.required_role().is_some()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route prefix '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("route prefix '{0}' must not contain a query or fragment")]
    HasQuery(String),

    #[error("route prefix '{0}' is listed twice")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    prefix: String,
    segments: Vec<String>,
    access: RouteAccess,
}

impl RouteRule {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn access(&self) -> RouteAccess {
        self.access
    }

    fn covers(&self, path: &[&str]) -> bool {
        path.len() >= self.segments.len()
            && self.segments.iter().zip(path).all(|(rule, seg)| rule == seg)
    }
}

/// Compiled prefix → access table. Built once at startup, read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    // Sorted by segment count, longest first.
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The deployment's protected areas.
    pub fn standard() -> Self {
        Self::from_rules(vec![
            rule("/dashboard/director", RouteAccess::DirectorOnly),
            rule("/dashboard/branches", RouteAccess::DirectorOnly),
            rule("/dashboard/employees", RouteAccess::DirectorOnly),
            rule("/dashboard/reports", RouteAccess::DirectorOnly),
            rule("/branch-dashboard", RouteAccess::BranchManagerOnly),
        ])
    }

    /// Most specific rule covering `path`, if any.
    pub fn matching(&self, path: &str) -> Option<&RouteRule> {
        let segments = normalize(path);
        self.rules.iter().find(|r| r.covers(&segments))
    }

    pub fn classify(&self, path: &str) -> RouteAccess {
        self.matching(path)
            .map(RouteRule::access)
            .unwrap_or(RouteAccess::Public)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    fn from_rules(mut rules: Vec<RouteRule>) -> Self {
        rules.sort_by(|a, b| b.segments.len().cmp(&a.segments.len()));
        Self { rules }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    entries: Vec<(String, RouteAccess)>,
}

impl RouteTableBuilder {
    pub fn director_only(self, prefix: impl Into<String>) -> Self {
        self.rule(prefix, RouteAccess::DirectorOnly)
    }

    pub fn branch_manager_only(self, prefix: impl Into<String>) -> Self {
        self.rule(prefix, RouteAccess::BranchManagerOnly)
    }

    /// Carve a public path out from under a protected prefix.
    pub fn public(self, prefix: impl Into<String>) -> Self {
        self.rule(prefix, RouteAccess::Public)
    }

    pub fn rule(mut self, prefix: impl Into<String>, access: RouteAccess) -> Self {
        self.entries.push((prefix.into(), access));
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut rules: Vec<RouteRule> = Vec::with_capacity(self.entries.len());
        for (prefix, access) in self.entries {
            if !prefix.starts_with('/') {
                return Err(RouteTableError::NotAbsolute(prefix));
            }
            if prefix.contains(['?', '#']) {
                return Err(RouteTableError::HasQuery(prefix));
            }
            let candidate = rule(&prefix, access);
            if rules.iter().any(|r| r.segments == candidate.segments) {
                return Err(RouteTableError::Duplicate(prefix));
            }
            rules.push(candidate);
        }
        Ok(RouteTable::from_rules(rules))
    }
}

fn rule(prefix: &str, access: RouteAccess) -> RouteRule {
    RouteRule {
        prefix: prefix.to_string(),
        segments: normalize(prefix).into_iter().map(str::to_string).collect(),
        access,
    }
}

/// Path → literal segments, dropping the query/fragment and empty segments.
fn normalize(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|seg| !seg.is_empty()).collect()
}
