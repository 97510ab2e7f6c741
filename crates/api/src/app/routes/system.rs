use axum::http::StatusCode;
use axum::response::Response;

use crate::app::errors::json_error;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
