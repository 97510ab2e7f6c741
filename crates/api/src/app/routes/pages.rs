//! Page surface.
//!
//! Every protected page runs its guard on activation, after the edge gate has
//! already let the request through. The guard reads the signed artifact, so a
//! request that slipped past the gate on a forged role cookie still ends at
//! the login page.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{MethodRouter, get},
};
use chrono::Utc;

use remitdesk_auth::{LOGIN_PATH, PageGuard, compose};

use crate::app::dto::PageView;
use crate::app::services::AppServices;
use crate::{authz, middleware};

pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::temporary(LOGIN_PATH) }))
        .route("/login", page("login", None))
        .route("/unauthorized", page("unauthorized", None))
        // Director area: every `/dashboard/*` page, including nested ones.
        .route("/dashboard/director", page("director_dashboard", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/director/*rest", page("director_dashboard", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/branches", page("branches", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/branches/*rest", page("branches", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/employees", page("employees", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/employees/*rest", page("employees", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/reports", page("reports", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/reports/*rest", page("reports", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/transactions", page("transactions", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/transactions/*rest", page("transactions", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/transfers", page("transfers", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/transfers/*rest", page("transfers", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/inventory", page("inventory", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/inventory/*rest", page("inventory", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/settings", page("settings", Some(PageGuard::DIRECTOR)))
        .route("/dashboard/settings/*rest", page("settings", Some(PageGuard::DIRECTOR)))
        // Branch manager area.
        .route("/branch-dashboard", page("branch_dashboard", Some(PageGuard::BRANCH_MANAGER)))
        .route("/branch-dashboard/*rest", page("branch_dashboard", Some(PageGuard::BRANCH_MANAGER)))
        // Shared transfer desk.
        .route("/money-transfer", page("money_transfer", Some(PageGuard::ANY_STAFF)))
        .route(
            "/money-transfer/employee-dashboard",
            page("employee_dashboard", Some(PageGuard::ANY_STAFF)),
        )
}

fn page(name: &'static str, guard: Option<PageGuard>) -> MethodRouter {
    get(move |Extension(services): Extension<Arc<AppServices>>, headers: HeaderMap| async move {
        render(name, guard, &services, &headers)
    })
}

fn render(name: &'static str, guard: Option<PageGuard>, services: &AppServices, headers: &HeaderMap) -> Response {
    let Some(guard) = guard else {
        return Json(PageView {
            page: name,
            role: None,
            branch_id: None,
            navigation: Vec::new(),
        })
        .into_response();
    };

    let cookies = middleware::session_cookies(headers);
    match authz::guard_page(guard, &services.issuer, &cookies, Utc::now()) {
        Ok(session) => Json(PageView {
            page: name,
            role: Some(session.role),
            navigation: compose(session.role),
            branch_id: session.branch_scope,
        })
        .into_response(),
        Err(redirect) => {
            tracing::debug!(page = name, reason = ?redirect.reason, "page guard redirect");
            Redirect::temporary(redirect.location).into_response()
        }
    }
}
