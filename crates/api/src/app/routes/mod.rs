use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod branches;
pub mod navigation;
pub mod pages;
pub mod system;

/// `/api` routes reachable without a session.
pub fn public_api_router() -> Router {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/validate-token", post(auth::validate_token))
}

/// `/api` routes that require a bearer session.
pub fn protected_api_router() -> Router {
    Router::new()
        .route("/auth/session", get(auth::session))
        .route("/navigation", get(navigation::navigation))
        .route("/branches/:branch_id/access", get(branches::access))
}
