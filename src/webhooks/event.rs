//! GitHub webhook event parsing.
//!
//! This module turns a raw webhook request into an [`Event`]: the event type
//! from the `X-GitHub-Event` header, the optional `action` from the JSON body,
//! and a small set of named fields pulled out of the payload for the event
//! types the bot cares about.
//!
//! # Parsing Strategy
//!
//! 1. The event type is read from the `X-GitHub-Event` header
//! 2. The body must be a JSON object
//! 3. `action` is taken from the body when it is a string
//! 4. Type-specific fields are copied only when present in the payload
//!
//! Unknown event types are not an error; they simply carry no extra fields.

use std::fmt;

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::server::App;
use crate::types::DeliveryId;

/// Header name for GitHub event type.
pub const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
pub const HEADER_DELIVERY: &str = "x-github-delivery";
/// Header name for GitHub signature.
pub const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A required header is missing or not valid UTF-8.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// The body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("webhook body is not a JSON object")]
    NotAnObject,
}

/// A raw webhook delivery, as handed to handlers.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl WebhookRequest {
    pub fn new(headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        WebhookRequest {
            headers,
            body: body.into(),
        }
    }

    /// Returns a header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One parsed webhook delivery.
///
/// The event borrows the [`App`] that received it for logging and
/// configuration lookup.
#[derive(Clone)]
pub struct Event<'a> {
    /// The event category (e.g. `issues`, `pull_request`).
    pub event_type: String,

    /// The sub-action (e.g. `opened`). `None` for events without one.
    pub action: Option<String>,

    /// The `X-GitHub-Delivery` id, when GitHub sent one.
    pub delivery: Option<DeliveryId>,

    app: &'a App,

    /// Per-event-type fields, only ever set by the parser.
    fields: Map<String, Value>,
}

impl<'a> Event<'a> {
    /// Creates an event with no extra fields.
    pub fn new(app: &'a App, event_type: impl Into<String>, action: Option<&str>) -> Self {
        Event {
            event_type: event_type.into(),
            action: action.map(str::to_string),
            delivery: None,
            app,
            fields: Map::new(),
        }
    }

    /// Parses a webhook delivery from its headers and raw body.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = Event::parse(&app, &headers, br#"{"action": "opened"}"#)?;
    /// assert_eq!(event.event_type, "issues");
    /// assert_eq!(event.key(), Some("issue"));
    /// ```
    pub fn parse(app: &'a App, headers: &HeaderMap, body: &[u8]) -> Result<Self, ParseError> {
        let event_type = headers
            .get(HEADER_EVENT)
            .and_then(|v| v.to_str().ok())
            .ok_or(ParseError::MissingHeader(HEADER_EVENT))?
            .to_string();

        let delivery = headers
            .get(HEADER_DELIVERY)
            .and_then(|v| v.to_str().ok())
            .map(DeliveryId::new);

        let payload = match serde_json::from_slice::<Value>(body)? {
            Value::Object(payload) => payload,
            _ => return Err(ParseError::NotAnObject),
        };

        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_string);
        let fields = extract_fields(&event_type, &payload);

        debug!(
            app = app.name(),
            event_type = %event_type,
            action = action.as_deref().unwrap_or(""),
            delivery_id = delivery.as_ref().map(DeliveryId::as_str).unwrap_or(""),
            "Parsed webhook event"
        );

        Ok(Event {
            event_type,
            action,
            delivery,
            app,
            fields,
        })
    }

    /// Parses the event carried by a [`WebhookRequest`].
    pub fn from_request(app: &'a App, request: &WebhookRequest) -> Result<Self, ParseError> {
        Self::parse(app, &request.headers, &request.body)
    }

    /// The application that received this event.
    pub fn app(&self) -> &'a App {
        self.app
    }

    /// Returns a named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a named field if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns a named field if it is an unsigned integer.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    /// All extracted fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The payload key of the item an `issues`/`pull_request` event is about:
    /// `issue` or `pull_request`.
    pub fn key(&self) -> Option<&str> {
        self.get_str("key")
    }

    /// The item's web URL, for `issues`/`pull_request` events.
    pub fn html_url(&self) -> Option<&str> {
        self.get_str("html_url")
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("action", &self.action)
            .field("delivery", &self.delivery)
            .field("app", &self.app.name())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Copies the fields handlers read for a given event type.
fn extract_fields(event_type: &str, payload: &Map<String, Value>) -> Map<String, Value> {
    let mut fields = Map::new();

    match event_type {
        "issues" | "pull_request" => {
            let key = if event_type == "issues" {
                "issue"
            } else {
                "pull_request"
            };
            fields.insert("key".to_string(), Value::from(key));

            if let Some(item) = payload.get(key).and_then(Value::as_object) {
                copy_field(item, "number", &mut fields, "number");
                copy_field(item, "html_url", &mut fields, "html_url");
                copy_field(item, "state", &mut fields, "state");
            }
            if let Some(full_name) = payload
                .get("repository")
                .and_then(|r| r.get("full_name"))
                .filter(|n| n.is_string())
            {
                fields.insert("repository".to_string(), full_name.clone());
            }
        }
        "project_card" => {
            if let Some(card) = payload.get("project_card").and_then(Value::as_object) {
                copy_field(card, "id", &mut fields, "card_id");
                copy_field(card, "column_id", &mut fields, "column_id");
                copy_field(card, "note", &mut fields, "note");
            }
        }
        _ => {}
    }

    fields
}

/// Copies `source[from]` into `fields[to]` unless it is absent or null.
fn copy_field(source: &Map<String, Value>, from: &str, fields: &mut Map<String, Value>, to: &str) {
    if let Some(value) = source.get(from).filter(|v| !v.is_null()) {
        fields.insert(to.to_string(), value.clone());
    }
}
