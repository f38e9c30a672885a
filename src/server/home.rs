//! Home page: what the bot is and how much GitHub API budget it has left.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{App, MAIN_PATH, WATCH_PATH};
use crate::github::get_rate_limits;

/// Name reported on the home page.
pub const BOT_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub name: &'static str,
    pub endpoints: [&'static str; 2],

    /// GitHub's `resources` rate limit section, or null if unavailable.
    pub rate_limits: Option<Value>,
}

/// Home page handler.
///
/// Always answers 200. A failed rate limit lookup is logged and reported as
/// `null`.
///
/// # Example
///
/// ```ignore
/// GET / HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {"name":"xdevbot","endpoints":["/gh/main","/gh/watch"],"rate_limits":{"core":{...}}}
/// ```
pub async fn home_handler(State(app): State<App>) -> Json<HomePage> {
    let rate_limits = get_rate_limits(app.github()).await.unwrap_or_else(|e| {
        warn!(error = %e, "Could not fetch rate limits");
        None
    });

    Json(HomePage {
        name: BOT_NAME,
        endpoints: [MAIN_PATH, WATCH_PATH],
        rate_limits,
    })
}
