//! Credential exchange and session lifecycle endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use remitdesk_auth::{AuthFailure, SessionRecord, session};

use crate::app::dto::{
    INVALID_CREDENTIALS_MESSAGE, LOGIN_OK_MESSAGE, LOGOUT_MESSAGE, LoginRequest, LoginResponse,
    MessageResponse, SERVER_ERROR_MESSAGE, SessionView, ValidateTokenRequest, ValidateTokenResponse,
};
use crate::app::errors::{json_error, with_cookies};
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// POST /api/auth/login
///
/// The only place user-visible authentication errors are produced.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("login body rejected: {rejection}");
            return json_error(StatusCode::BAD_REQUEST, "invalid_request", "username and password are required");
        }
    };

    let identity = match services.identities.verify(&req.username, &req.password) {
        Ok(identity) => identity,
        Err(AuthFailure::InvalidCredentials) => {
            tracing::warn!("login rejected: invalid credentials");
            return json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", INVALID_CREDENTIALS_MESSAGE);
        }
        Err(e @ AuthFailure::Unavailable(_)) => {
            tracing::error!("login failed: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", SERVER_ERROR_MESSAGE);
        }
    };

    let now = Utc::now();
    let issued = match services.issuer.issue_at(&identity, now) {
        Ok(issued) => issued,
        Err(e) => {
            tracing::error!("login failed: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", SERVER_ERROR_MESSAGE);
        }
    };

    tracing::info!(
        subject = identity.subject(),
        role = %identity.role(),
        session_id = %issued.claims.session_id,
        "login succeeded"
    );

    // Body and cookies are both rendered from this one record.
    let record = SessionRecord::from_issued(&issued);
    let cookies = session::set_cookie_headers(&record, now, services.cookie_policy);
    let body = LoginResponse {
        token: record.token,
        role: record.role,
        branch_id: record.branch_scope,
        user_id: record.user_id,
        username: record.subject,
        expires_at: record.expires_at,
        redirect_to: record.role.home_path(),
        message: LOGIN_OK_MESSAGE,
    };

    with_cookies(Json(body).into_response(), cookies)
}

/// POST /api/auth/logout
///
/// Clears the whole cookie mirror in one response. Artifacts are not revocable;
/// a copied token stays valid until it expires.
pub async fn logout(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let cookies = session::clear_cookie_headers(services.cookie_policy);
    with_cookies(
        Json(MessageResponse { message: LOGOUT_MESSAGE }).into_response(),
        cookies,
    )
}

/// POST /api/auth/validate-token
pub async fn validate_token(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<ValidateTokenRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return json_error(StatusCode::BAD_REQUEST, "invalid_request", "token is required");
    };

    let body = match services.issuer.decode(&req.token, Utc::now()) {
        Ok(claims) => ValidateTokenResponse {
            valid: true,
            user: Some(SessionView::from(&claims)),
        },
        Err(e) => {
            tracing::debug!("validate-token: {e}");
            ValidateTokenResponse { valid: false, user: None }
        }
    };
    Json(body).into_response()
}

/// GET /api/auth/session
pub async fn session(Extension(session): Extension<SessionContext>) -> Json<SessionView> {
    Json(SessionView::from(session.claims()))
}
