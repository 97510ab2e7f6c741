//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: identity provider, token issuer, edge gate
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with(services::AppServices::from_config(config))
}

/// Build the router around pre-wired services (custom identity providers,
/// route tables).
pub fn build_app_with(services: services::AppServices) -> Router {
    let auth_state = middleware::AuthState {
        issuer: services.issuer.clone(),
    };
    let gate = services.gate.clone();
    let services = Arc::new(services);

    // Bearer-authenticated API routes.
    let protected_api = routes::protected_api_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::public_api_router().merge(protected_api))
        .merge(routes::pages::router())
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(gate, middleware::edge_gate_middleware))
                .layer(Extension(services)),
        )
}
