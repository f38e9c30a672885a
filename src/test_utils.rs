//! Shared test utilities and arbitrary generators for property-based testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use http_body_util::BodyExt;
use proptest::prelude::*;
use serde_json::{Value, json};

use crate::config::Config;
use crate::effects::{ApiResponse, GitHubEffect, GitHubInterpreter};
use crate::github::GitHubApiError;
use crate::server::App;
use crate::types::ColumnId;
use crate::webhooks::event::HEADER_EVENT;
use crate::webhooks::{RouteTable, WebhookRequest};

type Responder = dyn Fn(&GitHubEffect) -> ApiResponse + Send + Sync;

/// A GitHub stand-in that answers every effect from a closure and records
/// what it was asked to do.
pub struct MockGitHub {
    respond: Box<Responder>,
    calls: Mutex<Vec<GitHubEffect>>,
}

impl MockGitHub {
    pub fn new(respond: impl Fn(&GitHubEffect) -> ApiResponse + Send + Sync + 'static) -> Self {
        MockGitHub {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every effect with the same response.
    pub fn with_response(response: ApiResponse) -> Self {
        MockGitHub::new(move |_| response.clone())
    }

    /// Effects interpreted so far, in order.
    pub fn calls(&self) -> Vec<GitHubEffect> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitHubInterpreter for MockGitHub {
    async fn interpret(&self, effect: GitHubEffect) -> Result<ApiResponse, GitHubApiError> {
        let response = (self.respond)(&effect);
        self.calls.lock().unwrap().push(effect);
        Ok(response)
    }
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        token: None,
        webhook_secret: None,
        new_column_id: ColumnId(10144279),
        done_column_id: ColumnId(9388249),
        board_column_ids: Vec::new(),
        github_timeout: Duration::from_secs(5),
    }
}

/// An app with no routes whose GitHub answers 404 to everything.
pub fn test_app(name: &str) -> App {
    let github = MockGitHub::with_response(ApiResponse::new(404, json!({"message": "Not Found"})));
    test_app_with(name, Arc::new(github))
}

pub fn test_app_with(name: &str, github: Arc<dyn GitHubInterpreter>) -> App {
    App::new(name, Arc::new(test_config()), github, RouteTable::new())
}

/// A delivery carrying `payload` with the given `X-GitHub-Event`.
pub fn webhook_request(event_type: &str, payload: &Value) -> WebhookRequest {
    let mut headers = HeaderMap::new();
    headers.insert(HEADER_EVENT, HeaderValue::from_str(event_type).unwrap());
    WebhookRequest::new(headers, serde_json::to_vec(payload).unwrap())
}

pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Issue and pull request URLs as they appear in card notes.
pub fn arb_ref_url() -> impl Strategy<Value = String> {
    (
        "[A-Za-z0-9_.-]{1,12}",
        "[A-Za-z0-9_.-]{1,16}",
        prop_oneof![Just("issues"), Just("pull")],
        1..100_000u32,
    )
        .prop_map(|(owner, repo, kind, number)| {
            format!("https://github.com/{owner}/{repo}/{kind}/{number}")
        })
}
