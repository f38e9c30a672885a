//! Handlers for the bot's two webhook endpoints.
//!
//! Each endpoint gets its own [`RouteTable`]. The watch endpoint receives
//! events from repositories whose issues and pull requests are tracked on the
//! project board; the main endpoint receives events from the board itself.
//!
//! # Routes
//!
//! | Endpoint | Event | Handler |
//! |----------|-------|---------|
//! | watch | `issues`/`pull_request` `opened` | `card_opened` - add a card to the new column |
//! | watch | `issues`/`pull_request` `reopened` | `card_reopened` - move the card back to the new column |
//! | watch | `issues`/`pull_request` `closed` | `card_closed` - move the card to the done column |
//! | main | `project_card` `created` | `card_created` - file cards whose references are all closed |
//! | both | `ping` | `pong` |

mod board;
mod watch;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

use super::event::{ParseError, WebhookRequest};
use super::routing::{RouteTable, handler_fn};
use crate::effects::ApiResponse;
use crate::github::GitHubApiError;
use crate::server::App;

pub use board::card_created;
pub use watch::{card_closed, card_opened, card_reopened};

/// Errors that can occur while handling an event.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The delivery could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The payload lacks a field this handler needs.
    #[error("payload is missing {0}")]
    MissingField(&'static str),

    /// GitHub could not be reached.
    #[error(transparent)]
    GitHub(#[from] GitHubApiError),

    /// GitHub answered with an error status.
    #[error("GitHub returned HTTP {status} for {operation}")]
    Unexpected { operation: &'static str, status: u16 },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::Parse(_) | HandlerError::MissingField(_) => StatusCode::BAD_REQUEST,
            HandlerError::GitHub(_) | HandlerError::Unexpected { .. } => StatusCode::BAD_GATEWAY,
        };
        warn!(error = %self, status = status.as_u16(), "Handler failed");
        (status, self.to_string()).into_response()
    }
}

/// Fails with [`HandlerError::Unexpected`] unless the response is 2xx.
fn expect_success(response: ApiResponse, operation: &'static str) -> Result<ApiResponse, HandlerError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(HandlerError::Unexpected {
            operation,
            status: response.status,
        })
    }
}

/// Answers GitHub's `ping` event, sent when a webhook is first configured.
pub async fn pong(_request: WebhookRequest, _app: App) -> Response {
    (StatusCode::OK, "pong").into_response()
}

/// Routes for the endpoint that watches tracked repositories.
pub fn watch_routes() -> RouteTable {
    let mut routes = RouteTable::new();

    let opened = routes.route("issues", Some("opened"), handler_fn(card_opened));
    routes.route("pull_request", Some("opened"), opened);

    let reopened = routes.route("issues", Some("reopened"), handler_fn(card_reopened));
    routes.route("pull_request", Some("reopened"), reopened);

    let closed = routes.route("issues", Some("closed"), handler_fn(card_closed));
    routes.route("pull_request", Some("closed"), closed);

    routes.route("ping", None, handler_fn(pong));
    routes
}

/// Routes for the endpoint that receives the board's own events.
pub fn main_routes() -> RouteTable {
    let mut routes = RouteTable::new();
    routes.route("project_card", Some("created"), handler_fn(card_created));
    routes.route("ping", None, handler_fn(pong));
    routes
}
