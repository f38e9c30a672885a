//! Health check endpoint for liveness probes.
//!
//! Returns 200 OK if the server is running, without touching GitHub.

use axum::http::StatusCode;

/// Health check handler.
///
/// Returns 200 OK with the text "OK".
///
/// # Example
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
///
/// OK
/// ```
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
