use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use remitdesk_auth::{EdgeGate, GateDecision, SessionCookies, TokenIssuer};

use crate::app::errors::json_error;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub issuer: TokenIssuer,
}

/// Bearer authentication for `/api` routes.
///
/// Decodes and fully validates the artifact (signature, scope, expiry) and
/// exposes it to handlers as a [`SessionContext`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return json_error(
            axum::http::StatusCode::UNAUTHORIZED,
            "session_missing",
            "a bearer session artifact is required",
        );
    };

    let claims = match state.issuer.decode(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("bearer artifact rejected: {e}");
            let code = if e.is_expired() { "session_expired" } else { "session_invalid" };
            return json_error(axum::http::StatusCode::UNAUTHORIZED, code, "session is not valid");
        }
    };

    req.extensions_mut().insert(SessionContext::new(claims));
    next.run(req).await
}

/// Edge gate: runs on every request before routing reaches a page.
///
/// Looks only at the cookie mirror. Never touches the session itself.
pub async fn edge_gate_middleware(
    State(gate): State<EdgeGate>,
    req: Request,
    next: Next,
) -> Response {
    let cookies = session_cookies(req.headers());
    match gate.evaluate(req.uri().path(), &cookies) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::RedirectTo(redirect) => {
            tracing::debug!(
                path = req.uri().path(),
                reason = ?redirect.reason,
                "edge gate redirect"
            );
            Redirect::temporary(redirect.location).into_response()
        }
    }
}

/// Cookie mirror from every `Cookie` header on the request.
pub fn session_cookies(headers: &HeaderMap) -> SessionCookies {
    SessionCookies::from_cookie_headers(
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok()),
    )
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
