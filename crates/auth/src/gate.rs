//! Edge authorization gate.
//!
//! Runs on every request before page code. It looks only at the cookie
//! mirror (token presence + role), never at the signature or expiry; the page
//! guard and the bearer middleware are the authorities of record.

use serde::Serialize;

use crate::{Role, RouteTable, SessionCookies};

/// Where the edge gate sends callers it turns away.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Why a navigation was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Denial {
    /// No session, or an expired one.
    SessionMissing,
    /// A session exists but for a role the route does not admit.
    SessionRoleMismatch { required: Role },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: &'static str,
    pub reason: Denial,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum GateDecision {
    Allow,
    RedirectTo(Redirect),
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }

    pub fn location(&self) -> Option<&'static str> {
        match self {
            GateDecision::Allow => None,
            GateDecision::RedirectTo(r) => Some(r.location),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdgeGate {
    routes: RouteTable,
}

impl EdgeGate {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide whether `path` may proceed given the cookie mirror.
    ///
    /// Pure: the same inputs always produce the same decision.
    pub fn evaluate(&self, path: &str, cookies: &SessionCookies) -> GateDecision {
        let Some(required) = self.routes.classify(path).required_role() else {
            return GateDecision::Allow;
        };

        if !cookies.has_token() {
            return redirect(Denial::SessionMissing);
        }
        if cookies.role() != Some(required) {
            return redirect(Denial::SessionRoleMismatch { required });
        }
        GateDecision::Allow
    }
}

fn redirect(reason: Denial) -> GateDecision {
    GateDecision::RedirectTo(Redirect {
        location: UNAUTHORIZED_PATH,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cookies(token: Option<&str>, role: Option<&str>) -> SessionCookies {
        SessionCookies {
            token: token.map(str::to_string),
            role: role.map(str::to_string),
            branch_id: None,
        }
    }

    #[test]
    fn director_session_reaches_director_pages() {
        let gate = EdgeGate::default();
        let c = cookies(Some("t"), Some("director"));
        assert_eq!(gate.evaluate("/dashboard/director", &c), GateDecision::Allow);
        assert_eq!(gate.evaluate("/dashboard/branches/3", &c), GateDecision::Allow);
    }

    #[test]
    fn branch_manager_is_turned_away_from_director_pages() {
        let gate = EdgeGate::default();
        let c = cookies(Some("t"), Some("branch_manager"));
        assert_eq!(
            gate.evaluate("/dashboard/director", &c),
            GateDecision::RedirectTo(Redirect {
                location: UNAUTHORIZED_PATH,
                reason: Denial::SessionRoleMismatch { required: Role::Director },
            })
        );
        assert_eq!(gate.evaluate("/branch-dashboard", &c), GateDecision::Allow);
    }

    #[test]
    fn missing_token_is_refused_even_with_matching_role_cookie() {
        let gate = EdgeGate::default();
        let decision = gate.evaluate("/branch-dashboard", &cookies(None, Some("branch_manager")));
        assert_eq!(
            decision,
            GateDecision::RedirectTo(Redirect {
                location: UNAUTHORIZED_PATH,
                reason: Denial::SessionMissing,
            })
        );

        let empty = gate.evaluate("/branch-dashboard", &cookies(Some(""), Some("branch_manager")));
        assert_eq!(empty.location(), Some(UNAUTHORIZED_PATH));
    }

    #[test]
    fn public_paths_pass_without_a_session() {
        let gate = EdgeGate::default();
        let none = SessionCookies::default();
        for path in ["/", "/login", "/money-transfer", "/dashboard/branches-archive"] {
            assert!(gate.evaluate(path, &none).is_allow(), "{path}");
        }
    }

    #[test]
    fn unknown_role_cookie_is_a_mismatch() {
        let gate = EdgeGate::default();
        let decision = gate.evaluate("/dashboard/reports", &cookies(Some("t"), Some("admin")));
        assert_eq!(decision.location(), Some(UNAUTHORIZED_PATH));
    }

    fn protected_path() -> impl Strategy<Value = (String, Role)> {
        let prefixes = prop::sample::select(vec![
            ("/dashboard/director", Role::Director),
            ("/dashboard/branches", Role::Director),
            ("/dashboard/employees", Role::Director),
            ("/dashboard/reports", Role::Director),
            ("/branch-dashboard", Role::BranchManager),
        ]);
        (prefixes, prop::collection::vec(segment(), 0..4)).prop_map(|((prefix, role), tail)| {
            let mut path = prefix.to_string();
            for seg in tail {
                path.push('/');
                path.push_str(&seg);
            }
            (path, role)
        })
    }

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => "[a-z0-9]{1,8}",
            1 => Just(".".to_string()),
            1 => Just("..".to_string()),
        ]
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a session whose role differs from the route's required
        /// role is always sent to the unauthorized page.
        #[test]
        fn role_mismatch_always_redirects((path, required) in protected_path(), role in any_role()) {
            let gate = EdgeGate::default();
            let c = cookies(Some("token"), Some(role.as_str()));
            let decision = gate.evaluate(&path, &c);
            if role == required {
                prop_assert_eq!(decision, GateDecision::Allow);
            } else {
                prop_assert_eq!(decision.location(), Some(UNAUTHORIZED_PATH));
            }
        }

        /// Property: without a session, no path under a protected prefix gets
        /// through, however many `.`/`..` segments follow it.
        #[test]
        fn dot_segments_never_escape_a_protected_prefix((path, _) in protected_path()) {
            let gate = EdgeGate::default();
            prop_assert_eq!(
                gate.evaluate(&path, &SessionCookies::default()).location(),
                Some(UNAUTHORIZED_PATH)
            );
        }

        /// Property: evaluating twice with the same inputs gives the same decision.
        #[test]
        fn evaluation_is_idempotent(
            path in "(/[a-z\\-]{0,12}){0,4}",
            token in prop::option::of("[a-z]{0,4}"),
            role in prop::option::of(prop::sample::select(vec!["director", "branch_manager", "employee", "x"])),
        ) {
            let gate = EdgeGate::default();
            let c = cookies(token.as_deref(), role);
            prop_assert_eq!(gate.evaluate(&path, &c), gate.evaluate(&path, &c));
        }

        /// Property: appending a non-separator suffix to a protected prefix
        /// leaves the standard table's protection behind.
        #[test]
        fn string_prefix_siblings_are_public(suffix in "[a-z\\-]{1,8}") {
            let gate = EdgeGate::default();
            let path = format!("/dashboard/branches{suffix}");
            prop_assert!(gate.evaluate(&path, &SessionCookies::default()).is_allow());
        }
    }
}
