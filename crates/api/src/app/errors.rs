use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use remitdesk_auth::ScopeError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn scope_error_to_response(err: ScopeError) -> Response {
    match err {
        ScopeError::OutsideBranch { .. } => json_error(StatusCode::FORBIDDEN, "branch_forbidden", err.to_string()),
        ScopeError::MissingScope(_) => json_error(StatusCode::FORBIDDEN, "scope_missing", err.to_string()),
    }
}

/// Attach `Set-Cookie` values to a response.
///
/// Either every cookie is written or the response becomes a 500: a partial
/// mirror would let the edge gate and the page guard disagree.
pub fn with_cookies(mut res: Response, cookies: Vec<String>) -> Response {
    let mut values = Vec::with_capacity(cookies.len());
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(v) => values.push(v),
            Err(_) => {
                tracing::error!("refusing to emit an invalid Set-Cookie header");
                return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", super::dto::SERVER_ERROR_MESSAGE);
            }
        }
    }
    for v in values {
        res.headers_mut().append(header::SET_COOKIE, v);
    }
    res
}
