//! `remitdesk-auth` — session issuance and route authorization.
//!
//! This crate is intentionally decoupled from HTTP: every check is a plain
//! function over typed inputs, so the API layer, tests and any client share
//! the same decisions.

pub mod authorize;
pub mod claims;
pub mod gate;
pub mod guard;
pub mod identity;
pub mod navigation;
pub mod roles;
pub mod routes;
pub mod secret;
pub mod session;
pub mod token;

pub use authorize::{ScopeError, authorize_branch};
pub use claims::{ClaimsError, SessionClaims, TokenValidationError, validate_claims};
pub use gate::{Denial, EdgeGate, GateDecision, Redirect, UNAUTHORIZED_PATH};
pub use guard::{GuardOutcome, LOGIN_PATH, PageGuard};
pub use identity::{AuthFailure, Identity, IdentityProvider, StaticIdentityTable};
pub use navigation::{Capability, NavEntry, compose};
pub use roles::{Role, UnknownRole};
pub use routes::{RouteAccess, RouteRule, RouteTable, RouteTableError};
pub use secret::{MIN_SECRET_LEN, SecretError, SigningSecret};
pub use session::{CookiePolicy, SessionCookies, SessionManager, SessionRecord};
pub use token::{IssuedSession, SESSION_TTL_SECS, TokenError, TokenIssuer};
