use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use remitdesk_core::BranchId;

use crate::app::dto::BranchAccessResponse;
use crate::app::errors::{json_error, scope_error_to_response};
use crate::authz;
use crate::context::SessionContext;

/// GET /api/branches/:branch_id/access
///
/// 200 when the caller may act on the branch, 403 otherwise. Branch-scoped
/// CRUD endpoints run the same check before touching data.
pub async fn access(
    Extension(session): Extension<SessionContext>,
    Path(branch_id): Path<String>,
) -> Response {
    let branch_id = match BranchId::new(branch_id) {
        Ok(id) => id,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, "invalid_branch_id", e.to_string()),
    };

    if let Err(e) = authz::authorize_branch_access(&session, &branch_id) {
        tracing::debug!(session_id = %session.session_id(), "branch access denied: {e}");
        return scope_error_to_response(e);
    }

    Json(BranchAccessResponse {
        branch_id,
        allowed: true,
    })
    .into_response()
}
