//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Event parsing from the `X-GitHub-Event` header and JSON body
//! - The route table mapping `(event type, action)` to handlers
//! - The bot's handlers for the main and watch endpoints

pub mod event;
pub mod handlers;
pub mod routing;
pub mod signature;

pub use event::{Event, ParseError, WebhookRequest};
pub use handlers::{HandlerError, main_routes, watch_routes};
pub use routing::{Handler, HandlerRef, RouteTable, handler_fn, route_not_implemented};
pub use signature::{sign, verify_signature};
