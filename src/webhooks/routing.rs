//! Routing of webhook events to handlers.
//!
//! A [`RouteTable`] maps `(event type, action)` pairs to handlers. It is
//! filled in while the application is being assembled and is read-only once
//! it is moved into an [`App`], so lookups need no locking.
//!
//! # Matching
//!
//! Lookup is exact on both parts of the key. An action of `None` is its own
//! key and only matches events that carry no action. There are no wildcards:
//! an event with a registered type but an unregistered action goes to the
//! fallback handler, which answers 200 and takes no action.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};

use super::event::{Event, HEADER_EVENT, WebhookRequest};
use crate::server::App;

/// The future a handler returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A webhook handler.
///
/// Handlers receive the raw request rather than the parsed [`Event`], so they
/// can read anything in the payload. Any `async fn(WebhookRequest, App) ->
/// Response` is a handler.
pub trait Handler: Send + Sync {
    fn call(&self, request: WebhookRequest, app: App) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(WebhookRequest, App) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: WebhookRequest, app: App) -> HandlerFuture {
        Box::pin(self(request, app))
    }
}

/// A shared handler. Dispatch hands out clones of the registered `Arc`, so
/// `Arc::ptr_eq` tells which handler was chosen.
pub type HandlerRef = Arc<dyn Handler>;

/// Wraps a handler function for registration.
pub fn handler_fn<F, Fut>(f: F) -> HandlerRef
where
    F: Fn(WebhookRequest, App) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(f)
}

/// Routing key: event type plus optional action.
type RouteKey = (String, Option<String>);

/// The table of registered handlers, plus the fallback for unmatched events.
pub struct RouteTable {
    routes: HashMap<RouteKey, HandlerRef>,
    fallback: HandlerRef,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        RouteTable {
            routes: HashMap::new(),
            fallback: handler_fn(route_not_implemented),
        }
    }

    /// Registers `handler` for `(event_type, action)` and returns it unchanged.
    ///
    /// Passing the returned handler to another `route` call registers the same
    /// handler under several keys:
    ///
    /// ```ignore
    /// let mut routes = RouteTable::new();
    /// let opened = routes.route("issues", Some("opened"), handler_fn(card_opened));
    /// routes.route("pull_request", Some("opened"), opened);
    /// ```
    ///
    /// Registering a key twice keeps the later handler.
    pub fn route(
        &mut self,
        event_type: &str,
        action: Option<&str>,
        handler: HandlerRef,
    ) -> HandlerRef {
        let key = (event_type.to_string(), action.map(str::to_string));
        if self.routes.insert(key, Arc::clone(&handler)).is_some() {
            warn!(
                event_type,
                action = action.unwrap_or(""),
                "Route registered twice; keeping the later handler"
            );
        }
        handler
    }

    /// Returns the handler for an event, or the fallback handler.
    pub fn dispatch(&self, event: &Event<'_>) -> HandlerRef {
        let key = (event.event_type.clone(), event.action.clone());
        match self.routes.get(&key) {
            Some(handler) => {
                debug!(
                    app = event.app().name(),
                    event_type = %event.event_type,
                    action = event.action.as_deref().unwrap_or(""),
                    "Dispatching event"
                );
                Arc::clone(handler)
            }
            None => Arc::clone(&self.fallback),
        }
    }

    /// The handler used for unmatched events.
    pub fn fallback(&self) -> &HandlerRef {
        &self.fallback
    }

    /// Returns true if `(event_type, action)` has a handler.
    pub fn contains(&self, event_type: &str, action: Option<&str>) -> bool {
        self.routes
            .contains_key(&(event_type.to_string(), action.map(str::to_string)))
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.routes.keys().collect();
        keys.sort();
        f.debug_struct("RouteTable")
            .field("routes", &keys)
            .finish_non_exhaustive()
    }
}

/// Fallback handler: logs that nothing matched and answers 200.
pub async fn route_not_implemented(request: WebhookRequest, app: App) -> Response {
    let action = serde_json::from_slice::<serde_json::Value>(&request.body)
        .ok()
        .and_then(|body| body.get("action").and_then(|a| a.as_str()).map(str::to_string));

    info!(
        app = app.name(),
        event_type = request.header(HEADER_EVENT).unwrap_or(""),
        action = action.as_deref().unwrap_or(""),
        "No route for event; taking no action"
    );

    (StatusCode::OK, "No action taken").into_response()
}
