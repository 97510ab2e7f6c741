//! Page-level authorization guard.
//!
//! Runs when a protected page activates, before it fetches anything on the
//! caller's behalf. Unlike the edge gate it reads the session record itself
//! and honours expiry: an expired session is treated exactly like no session.

use chrono::{DateTime, Utc};

use crate::gate::{Denial, Redirect};
use crate::{Role, SessionRecord};

/// Where the page guard sends callers it turns away.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    RedirectTo(Redirect),
}

impl GuardOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardOutcome::Proceed)
    }
}

/// Roles a page admits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageGuard {
    admits: &'static [Role],
}

impl PageGuard {
    pub const DIRECTOR: PageGuard = PageGuard::new(&[Role::Director]);
    pub const BRANCH_MANAGER: PageGuard = PageGuard::new(&[Role::BranchManager]);
    pub const ANY_STAFF: PageGuard = PageGuard::new(&Role::ALL);

    pub const fn new(admits: &'static [Role]) -> Self {
        Self { admits }
    }

    pub fn admits(&self) -> &'static [Role] {
        self.admits
    }

    pub fn check(&self, session: Option<&SessionRecord>, now: DateTime<Utc>) -> GuardOutcome {
        let Some(session) = session.filter(|s| !s.is_expired(now)) else {
            return deny(Denial::SessionMissing);
        };
        if self.admits.contains(&session.role) {
            return GuardOutcome::Proceed;
        }
        // Report the first admitted role; single-role pages are the common case.
        match self.admits.first() {
            Some(&required) => deny(Denial::SessionRoleMismatch { required }),
            None => deny(Denial::SessionMissing),
        }
    }
}

fn deny(reason: Denial) -> GuardOutcome {
    GuardOutcome::RedirectTo(Redirect {
        location: LOGIN_PATH,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use remitdesk_core::{BranchId, SessionId};

    fn session(role: Role, expires_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            token: "t".into(),
            subject: "s".into(),
            role,
            branch_scope: role.is_branch_scoped().then(|| BranchId::new("b1").unwrap()),
            user_id: None,
            session_id: SessionId::new(),
            expires_at,
        }
    }

    #[test]
    fn absent_session_goes_to_login() {
        let outcome = PageGuard::DIRECTOR.check(None, Utc::now());
        assert_eq!(
            outcome,
            GuardOutcome::RedirectTo(Redirect {
                location: LOGIN_PATH,
                reason: Denial::SessionMissing,
            })
        );
    }

    #[test]
    fn expired_session_counts_as_missing_even_with_role_present() {
        let now = Utc::now();
        let expired = session(Role::Director, now - Duration::seconds(1));
        assert_eq!(
            PageGuard::DIRECTOR.check(Some(&expired), now),
            GuardOutcome::RedirectTo(Redirect {
                location: LOGIN_PATH,
                reason: Denial::SessionMissing,
            })
        );

        let at_boundary = session(Role::Director, now);
        assert!(!PageGuard::DIRECTOR.check(Some(&at_boundary), now).is_proceed());
    }

    #[test]
    fn wrong_role_goes_to_login() {
        let now = Utc::now();
        let employee = session(Role::Employee, now + Duration::hours(1));
        assert_eq!(
            PageGuard::BRANCH_MANAGER.check(Some(&employee), now),
            GuardOutcome::RedirectTo(Redirect {
                location: LOGIN_PATH,
                reason: Denial::SessionRoleMismatch { required: Role::BranchManager },
            })
        );
    }

    #[test]
    fn matching_role_proceeds() {
        let now = Utc::now();
        for role in Role::ALL {
            let s = session(role, now + Duration::hours(1));
            assert!(PageGuard::ANY_STAFF.check(Some(&s), now).is_proceed());
        }
        let director = session(Role::Director, now + Duration::hours(1));
        assert!(PageGuard::DIRECTOR.check(Some(&director), now).is_proceed());
    }

    #[test]
    fn guard_admitting_nobody_refuses_everyone() {
        let now = Utc::now();
        let s = session(Role::Director, now + Duration::hours(1));
        assert!(!PageGuard::new(&[]).check(Some(&s), now).is_proceed());
    }
}
