//! HTTP server for the board bot.
//!
//! This module implements the HTTP server that:
//! - Accepts webhooks from GitHub on one endpoint per [`App`]
//! - Describes itself and GitHub's rate limits on the home page
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `GET /` - Returns the bot's name, endpoints and rate limits as JSON
//! - `GET /health` - Returns 200 if server is running
//! - `POST /gh/main` - Events from the project board itself
//! - `POST /gh/watch` - Events from watched repositories

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::effects::GitHubInterpreter;
use crate::webhooks::{RouteTable, main_routes, watch_routes};

pub mod health;
pub mod home;
pub mod webhook;

pub use health::health_handler;
pub use home::home_handler;
pub use webhook::webhook_handler;

/// Path of the main endpoint.
pub const MAIN_PATH: &str = "/gh/main";

/// Path of the watch endpoint.
pub const WATCH_PATH: &str = "/gh/watch";

/// A webhook application: a named route table plus everything its handlers
/// need.
///
/// This is passed to the webhook endpoint via Axum's `State` extractor and on
/// to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    /// Name used in logs and the home page.
    name: String,

    config: Arc<Config>,

    /// GitHub API access shared by all apps.
    github: Arc<dyn GitHubInterpreter>,

    routes: RouteTable,
}

impl App {
    pub fn new(
        name: impl Into<String>,
        config: Arc<Config>,
        github: Arc<dyn GitHubInterpreter>,
        routes: RouteTable,
    ) -> Self {
        App {
            inner: Arc::new(AppInner {
                name: name.into(),
                config,
                github,
                routes,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn github(&self) -> &dyn GitHubInterpreter {
        self.inner.github.as_ref()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name())
            .field("routes", self.routes())
            .finish_non_exhaustive()
    }
}

/// Builds the main and watch apps and the router serving them.
pub fn build_router(config: Arc<Config>, github: Arc<dyn GitHubInterpreter>) -> Router {
    let main = App::new("main", config.clone(), github.clone(), main_routes());
    let watch = App::new("watch", config, github, watch_routes());
    router(main, watch)
}

/// Builds the axum Router with all endpoints.
pub fn router(main: App, watch: App) -> Router {
    Router::new()
        .route("/", get(home_handler).with_state(main.clone()))
        .route("/health", get(health_handler))
        .route(MAIN_PATH, post(webhook_handler).with_state(main))
        .route(WATCH_PATH, post(webhook_handler).with_state(watch))
        .layer(TraceLayer::new_for_http())
}
