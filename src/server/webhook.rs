//! Webhook endpoint handler.
//!
//! Accepts GitHub webhook deliveries, validates signatures, parses the event,
//! and runs whichever handler the receiving [`App`]'s route table selects.
//! The handler's response is returned to GitHub as-is.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use super::App;
use crate::webhooks::event::{HEADER_DELIVERY, HEADER_SIGNATURE};
use crate::webhooks::{Event, Handler, ParseError, WebhookRequest, verify_signature};

/// Errors that can occur before a delivery reaches its handler.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Invalid signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// The delivery could not be parsed into an event.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::Parse(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-GitHub-Event`: Event type (e.g., "issues", "pull_request")
///   - `X-Hub-Signature-256`: HMAC-SHA256 signature of the payload, only
///     when a webhook secret is configured
/// - Optional headers:
///   - `X-GitHub-Delivery`: Unique delivery ID, used for logging
/// - Body: JSON webhook payload
///
/// # Response
///
/// - Whatever the matched handler returns
/// - 200 OK: No handler registered for the event
/// - 400 Bad Request: Missing header or invalid JSON
/// - 401 Unauthorized: Invalid signature
///
/// # Example
///
/// ```ignore
/// POST /gh/watch HTTP/1.1
/// X-GitHub-Event: issues
/// X-GitHub-Delivery: 550e8400-e29b-41d4-a716-446655440000
/// X-Hub-Signature-256: sha256=...
/// Content-Type: application/json
///
/// {"action": "opened", "issue": {...}, "repository": {...}}
///
/// HTTP/1.1 201 Created
/// ```
pub async fn webhook_handler(
    State(app): State<App>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let delivery_id = headers
        .get(HEADER_DELIVERY)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Verify signature BEFORE any parsing.
    if let Some(secret) = app.config().webhook_secret.as_deref() {
        let signature_header = headers
            .get(HEADER_SIGNATURE)
            .and_then(|v| v.to_str().ok())
            .ok_or(WebhookError::MissingHeader(HEADER_SIGNATURE))?;

        if !verify_signature(&body, signature_header, secret) {
            warn!(app = app.name(), delivery_id = %delivery_id, "Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }
    }

    let handler = {
        let event = Event::parse(&app, &headers, &body).inspect_err(|e| {
            warn!(app = app.name(), delivery_id = %delivery_id, error = %e, "Unparseable webhook");
        })?;
        app.routes().dispatch(&event)
    };

    debug!(app = app.name(), delivery_id = %delivery_id, "Running handler");
    let response = handler.call(WebhookRequest::new(headers, body), app).await;

    debug!(
        delivery_id = %delivery_id,
        status = response.status().as_u16(),
        "Webhook handled"
    );
    Ok(response)
}
