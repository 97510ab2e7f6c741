//! Client-held session state.
//!
//! One [`SessionRecord`] is the source of truth. The cookie mirror read by the
//! edge gate is always *derived* from it ([`SessionRecord::cookies`],
//! [`set_cookie_headers`]), and [`SessionManager`] is the single owner on the
//! client side, so the page-local view and the cookie view cannot disagree on
//! the role.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remitdesk_core::{BranchId, SessionId, UserId};

use crate::{IssuedSession, Role, SessionClaims};

pub const TOKEN_COOKIE: &str = "token";
pub const ROLE_COOKIE: &str = "userRole";
pub const BRANCH_COOKIE: &str = "branchId";

/// The cookie-resident mirror of a session, as the edge gate sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub token: Option<String>,
    pub role: Option<String>,
    pub branch_id: Option<String>,
}

impl SessionCookies {
    /// Parse one or more `Cookie:` header values.
    ///
    /// Unknown cookies are ignored; for a repeated name the first value wins,
    /// matching how browsers order more specific paths first.
    pub fn from_cookie_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut out = Self::default();
        for header in headers {
            for pair in header.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let value = value.trim().trim_matches('"');
                let slot = match name.trim() {
                    TOKEN_COOKIE => &mut out.token,
                    ROLE_COOKIE => &mut out.role,
                    BRANCH_COOKIE => &mut out.branch_id,
                    _ => continue,
                };
                if slot.is_none() && !value.is_empty() {
                    *slot = Some(value.to_string());
                }
            }
        }
        out
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The mirrored role, if present and one of the known roles.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

/// Everything a client keeps about its current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub subject: String,
    pub role: Role,
    pub branch_scope: Option<BranchId>,
    pub user_id: Option<UserId>,
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn from_claims(token: impl Into<String>, claims: &SessionClaims) -> Self {
        Self {
            token: token.into(),
            subject: claims.sub.clone(),
            role: claims.role,
            branch_scope: claims.branch_id.clone(),
            user_id: claims.user_id.clone(),
            session_id: claims.session_id,
            expires_at: claims.expires_at,
        }
    }

    pub fn from_issued(issued: &IssuedSession) -> Self {
        Self::from_claims(issued.token.clone(), &issued.claims)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The cookie mirror for this record.
    pub fn cookies(&self) -> SessionCookies {
        SessionCookies {
            token: Some(self.token.clone()),
            role: Some(self.role.as_str().to_string()),
            branch_id: self.branch_scope.as_ref().map(|b| b.as_str().to_string()),
        }
    }

    /// `Authorization` header value for API calls made on this session's behalf.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Attributes shared by every session cookie.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    fn attributes(&self, max_age: i64) -> String {
        let mut attrs = format!("Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }
}

/// `Set-Cookie` values that write the whole mirror for `record`.
///
/// Max-Age is the artifact's remaining lifetime, so the mirror never outlives
/// the session it describes. A director's record clears `branchId`.
pub fn set_cookie_headers(record: &SessionRecord, now: DateTime<Utc>, policy: CookiePolicy) -> Vec<String> {
    let max_age = (record.expires_at - now).num_seconds().max(0);
    let attrs = policy.attributes(max_age);
    let mut headers = vec![
        format!("{TOKEN_COOKIE}={}; {attrs}", record.token),
        format!("{ROLE_COOKIE}={}; {attrs}", record.role.as_str()),
    ];
    match &record.branch_scope {
        Some(branch) => headers.push(format!("{BRANCH_COOKIE}={branch}; {attrs}")),
        None => headers.push(format!("{BRANCH_COOKIE}=; {}", policy.attributes(0))),
    }
    headers
}

/// `Set-Cookie` values that remove the whole mirror at once.
pub fn clear_cookie_headers(policy: CookiePolicy) -> Vec<String> {
    let attrs = policy.attributes(0);
    [TOKEN_COOKIE, ROLE_COOKIE, BRANCH_COOKIE]
        .into_iter()
        .map(|name| format!("{name}=; {attrs}"))
        .collect()
}

/// Single authoritative owner of the client's session.
///
/// Login and logout are the only writers. Readers get a clone of the whole
/// record, so a read racing a write observes either the old or the new
/// session, never a mix.
#[derive(Debug, Default)]
pub struct SessionManager {
    record: RwLock<Option<SessionRecord>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any current session with `record`.
    pub fn establish(&self, record: SessionRecord) {
        tracing::debug!(session_id = %record.session_id, role = %record.role, "session established");
        *self.record.write().unwrap_or_else(PoisonError::into_inner) = Some(record);
    }

    /// Drop the session. Returns what was held, if anything.
    pub fn clear(&self) -> Option<SessionRecord> {
        let previous = self.record.write().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(prev) = &previous {
            tracing::debug!(session_id = %prev.session_id, "session cleared");
        }
        previous
    }

    /// The stored record, expired or not.
    pub fn current(&self) -> Option<SessionRecord> {
        self.record.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The stored record if it is still within its validity window.
    pub fn active(&self, now: DateTime<Utc>) -> Option<SessionRecord> {
        self.current().filter(|r| !r.is_expired(now))
    }

    /// Cookie mirror of the current record (empty when logged out).
    pub fn cookies(&self) -> SessionCookies {
        self.current().map(|r| r.cookies()).unwrap_or_default()
    }

    /// Bearer header for outgoing API calls, if a live session exists.
    pub fn authorization(&self, now: DateTime<Utc>) -> Option<String> {
        self.active(now).map(|r| r.bearer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(role: Role, branch: Option<&str>, expires_in: Duration) -> SessionRecord {
        SessionRecord {
            token: "hdr.payload.sig".to_string(),
            subject: "someone".to_string(),
            role,
            branch_scope: branch.map(|b| BranchId::new(b).unwrap()),
            user_id: None,
            session_id: SessionId::new(),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[test]
    fn parses_cookie_header_and_ignores_noise() {
        let c = SessionCookies::from_cookie_headers([
            "theme=dark; token=abc.def.ghi; userRole=branch_manager",
            "branchId=b1; token=second",
        ]);
        assert_eq!(c.token.as_deref(), Some("abc.def.ghi"));
        assert_eq!(c.role(), Some(Role::BranchManager));
        assert_eq!(c.branch_id.as_deref(), Some("b1"));
    }

    #[test]
    fn empty_or_malformed_pairs_count_as_absent() {
        let c = SessionCookies::from_cookie_headers(["token=; userRole; junk"]);
        assert!(!c.has_token());
        assert_eq!(c.role, None);
        assert_eq!(SessionCookies::from_cookie_headers([]), SessionCookies::default());
    }

    #[test]
    fn mirror_always_matches_record_role() {
        let manager = SessionManager::new();
        assert_eq!(manager.cookies(), SessionCookies::default());

        manager.establish(record(Role::Employee, Some("b1"), Duration::hours(1)));
        let mirror = manager.cookies();
        assert_eq!(mirror.role(), Some(Role::Employee));
        assert_eq!(mirror.branch_id.as_deref(), Some("b1"));
        assert!(mirror.has_token());

        manager.establish(record(Role::Director, None, Duration::hours(1)));
        let mirror = manager.cookies();
        assert_eq!(mirror.role(), Some(Role::Director));
        assert_eq!(mirror.branch_id, None);

        assert!(manager.clear().is_some());
        assert_eq!(manager.cookies(), SessionCookies::default());
        assert!(manager.clear().is_none());
    }

    #[test]
    fn expired_record_is_not_active_and_yields_no_bearer() {
        let manager = SessionManager::new();
        manager.establish(record(Role::BranchManager, Some("b1"), Duration::seconds(-1)));

        assert!(manager.current().is_some());
        assert!(manager.active(Utc::now()).is_none());
        assert!(manager.authorization(Utc::now()).is_none());
    }

    #[test]
    fn live_record_yields_bearer_header() {
        let manager = SessionManager::new();
        manager.establish(record(Role::Director, None, Duration::hours(1)));
        assert_eq!(
            manager.authorization(Utc::now()).as_deref(),
            Some("Bearer hdr.payload.sig")
        );
    }

    #[test]
    fn set_cookie_headers_write_the_whole_mirror() {
        let r = record(Role::BranchManager, Some("b1"), Duration::hours(2));
        let now = r.expires_at - Duration::hours(2);
        let headers = set_cookie_headers(&r, now, CookiePolicy { secure: true });

        assert_eq!(headers.len(), 3);
        assert!(headers[0].starts_with("token=hdr.payload.sig; Path=/; Max-Age=7200"));
        assert!(headers[1].starts_with("userRole=branch_manager;"));
        assert!(headers[2].starts_with("branchId=b1;"));
        assert!(headers.iter().all(|h| h.ends_with("; Secure") && h.contains("HttpOnly")));

        // Feeding the cookies back in reproduces the record's mirror.
        let pairs: Vec<&str> = headers.iter().map(|h| h.split(';').next().unwrap()).collect();
        assert_eq!(SessionCookies::from_cookie_headers(pairs), r.cookies());
    }

    #[test]
    fn director_login_clears_stale_branch_cookie() {
        let r = record(Role::Director, None, Duration::hours(1));
        let headers = set_cookie_headers(&r, Utc::now(), CookiePolicy::default());
        assert!(headers[2].starts_with("branchId=; Path=/; Max-Age=0"));
        assert!(!headers[2].contains("Secure"));
    }

    #[test]
    fn clear_headers_expire_every_cookie() {
        let headers = clear_cookie_headers(CookiePolicy::default());
        assert_eq!(headers.len(), 3);
        assert!(headers.iter().all(|h| h.contains("Max-Age=0")));
    }
}
