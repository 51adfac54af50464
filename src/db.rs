use std::fmt::Display;

use axum::http::StatusCode;
use tracing::error;

/// Error half of every handler result.
pub type ApiError = (StatusCode, String);

pub fn internal<E: Display>(e: E) -> ApiError {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// True when the error chain bottoms out in a Postgres unique-constraint
/// violation.
pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
