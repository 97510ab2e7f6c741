use axum::{Json, extract::Extension};

use remitdesk_auth::compose;

use crate::app::dto::NavigationResponse;
use crate::context::SessionContext;

/// GET /api/navigation - menu for the caller's role.
pub async fn navigation(Extension(session): Extension<SessionContext>) -> Json<NavigationResponse> {
    let role = session.role();
    Json(NavigationResponse {
        role,
        entries: compose(role),
    })
}
