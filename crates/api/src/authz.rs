//! API-side authorization helpers.
//!
//! Page routes resolve their session from the signed artifact in the `token`
//! cookie (never from the mirrored role cookie) and then run the page guard.
//! API routes check branch scope against the bearer session.

use chrono::{DateTime, Utc};

use remitdesk_auth::{GuardOutcome, PageGuard, Redirect, ScopeError, SessionCookies, SessionRecord, TokenIssuer};
use remitdesk_core::BranchId;

use crate::context::SessionContext;

/// The authoritative session behind a page request, if the artifact verifies.
///
/// A forged, foreign or expired artifact yields `None`, which the page guard
/// treats as a missing session.
pub fn page_session(
    issuer: &TokenIssuer,
    cookies: &SessionCookies,
    now: DateTime<Utc>,
) -> Option<SessionRecord> {
    let token = cookies.token.as_deref()?;
    match issuer.decode(token, now) {
        Ok(claims) => {
            if cookies.role() != Some(claims.role) {
                // The edge gate trusted the mirror; the artifact wins from here on.
                tracing::warn!(
                    session_id = %claims.session_id,
                    artifact_role = %claims.role,
                    "role cookie disagrees with session artifact"
                );
            }
            Some(SessionRecord::from_claims(token, &claims))
        }
        Err(e) => {
            tracing::debug!("page session rejected: {e}");
            None
        }
    }
}

/// Run `guard` for a page activation. `Ok` carries the session to render with.
pub fn guard_page(
    guard: PageGuard,
    issuer: &TokenIssuer,
    cookies: &SessionCookies,
    now: DateTime<Utc>,
) -> Result<SessionRecord, Redirect> {
    let session = page_session(issuer, cookies, now);
    match guard.check(session.as_ref(), now) {
        GuardOutcome::Proceed => match session {
            Some(session) => Ok(session),
            None => Err(Redirect {
                location: remitdesk_auth::LOGIN_PATH,
                reason: remitdesk_auth::Denial::SessionMissing,
            }),
        },
        GuardOutcome::RedirectTo(redirect) => Err(redirect),
    }
}

/// Check that the bearer session may act on `target`.
pub fn authorize_branch_access(session: &SessionContext, target: &BranchId) -> Result<(), ScopeError> {
    session.claims().authorize_branch(target)
}
