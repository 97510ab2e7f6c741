use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remitdesk_auth::{NavEntry, Role, SessionClaims};
use remitdesk_core::{BranchId, SessionId, UserId};

pub const LOGIN_OK_MESSAGE: &str = "Login successful";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred while signing in";
pub const LOGOUT_MESSAGE: &str = "Logged out";

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    /// Always present; `null` for directors.
    pub branch_id: Option<BranchId>,
    pub user_id: Option<UserId>,
    pub username: String,
    pub expires_at: DateTime<Utc>,
    pub redirect_to: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Public view of a decoded session (no token).
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub username: String,
    pub role: Role,
    pub branch_id: Option<BranchId>,
    pub user_id: Option<UserId>,
    pub session_id: SessionId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&SessionClaims> for SessionView {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            username: claims.sub.clone(),
            role: claims.role,
            branch_id: claims.branch_id.clone(),
            user_id: claims.user_id.clone(),
            session_id: claims.session_id,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionView>,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub role: Role,
    pub entries: Vec<NavEntry>,
}

/// What a page hands to the view layer once its guard has passed.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub navigation: Vec<NavEntry>,
}

#[derive(Debug, Serialize)]
pub struct BranchAccessResponse {
    pub branch_id: BranchId,
    pub allowed: bool,
}
