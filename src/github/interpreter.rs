//! GitHub effect interpreter using octocrab.
//!
//! Effects are sent through octocrab's raw request path rather than its typed
//! builders: the classic projects API has no typed octocrab coverage, and the
//! bot wants the status code of every response as-is.
//!
//! Key implementation details:
//! - Relative routes are resolved against octocrab's base URI
//! - Project endpoints send the `inertia` preview media type
//! - Empty bodies (e.g. 204 on delete) decode to `null`

use async_trait::async_trait;
use http::header::ACCEPT;
use http::Method;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::effects::{ApiResponse, CARDS_PER_PAGE, GitHubEffect, GitHubInterpreter};

use super::client::OctocrabClient;
use super::error::GitHubApiError;

/// Media type for the classic projects API.
const PROJECTS_PREVIEW: &str = "application/vnd.github.inertia-preview+json";

/// Media type for everything else.
const DEFAULT_ACCEPT: &str = "application/vnd.github+json";

// ─── Interpreter Implementation ───────────────────────────────────────────────

#[async_trait]
impl GitHubInterpreter for OctocrabClient {
    async fn interpret(&self, effect: GitHubEffect) -> Result<ApiResponse, GitHubApiError> {
        let request = build_request(&effect);
        debug!(method = %request.method, route = %request.route, "GitHub API call");

        let response = send(self, request).await?;
        debug!(status = response.status, "GitHub API response");
        Ok(response)
    }
}

/// A request ready to be sent: method, route relative to the API root,
/// optional JSON body and the accept header to use.
#[derive(Debug, Clone, PartialEq)]
struct ApiRequest {
    method: Method,
    route: String,
    body: Option<Value>,
    accept: &'static str,
}

impl ApiRequest {
    fn project(method: Method, route: String, body: Option<Value>) -> Self {
        Self {
            method,
            route,
            body,
            accept: PROJECTS_PREVIEW,
        }
    }

    fn api(method: Method, route: String, body: Option<Value>) -> Self {
        Self {
            method,
            route,
            body,
            accept: DEFAULT_ACCEPT,
        }
    }
}

/// Maps an effect onto its REST/GraphQL request.
fn build_request(effect: &GitHubEffect) -> ApiRequest {
    match effect {
        GitHubEffect::CreateProjectCard { column_id, note } => ApiRequest::project(
            Method::POST,
            format!("/projects/columns/{column_id}/cards"),
            Some(json!({ "note": note })),
        ),
        GitHubEffect::ListProjectCards { column_id, page } => ApiRequest::project(
            Method::GET,
            format!("/projects/columns/{column_id}/cards?per_page={CARDS_PER_PAGE}&page={page}"),
            None,
        ),
        GitHubEffect::GetProjectCard { card_id } => ApiRequest::project(
            Method::GET,
            format!("/projects/columns/cards/{card_id}"),
            None,
        ),
        GitHubEffect::UpdateProjectCard {
            card_id,
            note,
            archived,
        } => {
            let mut body = Map::new();
            if let Some(note) = note {
                body.insert("note".to_string(), Value::String(note.clone()));
            }
            if let Some(archived) = archived {
                body.insert("archived".to_string(), Value::Bool(*archived));
            }
            ApiRequest::project(
                Method::PATCH,
                format!("/projects/columns/cards/{card_id}"),
                Some(Value::Object(body)),
            )
        }
        GitHubEffect::MoveProjectCard { card_id, column_id } => ApiRequest::project(
            Method::POST,
            format!("/projects/columns/cards/{card_id}/moves"),
            Some(json!({ "position": "top", "column_id": column_id })),
        ),
        GitHubEffect::DeleteProjectCard { card_id } => ApiRequest::project(
            Method::DELETE,
            format!("/projects/columns/cards/{card_id}"),
            None,
        ),
        GitHubEffect::GetIssue { repo, number } => ApiRequest::api(
            Method::GET,
            format!("/repos/{}/{}/issues/{number}", repo.owner, repo.repo),
            None,
        ),
        GitHubEffect::GraphQl { query } => ApiRequest::api(
            Method::POST,
            "/graphql".to_string(),
            Some(json!({ "query": query })),
        ),
        GitHubEffect::GetRateLimits => {
            ApiRequest::api(Method::GET, "/rate_limit".to_string(), None)
        }
    }
}

/// Sends a request and reads the whole body.
async fn send(client: &OctocrabClient, request: ApiRequest) -> Result<ApiResponse, GitHubApiError> {
    let octocrab = client.inner();

    let builder = http::Request::builder()
        .method(request.method)
        .uri(request.route.as_str())
        .header(ACCEPT, request.accept);
    let http_request = octocrab.build_request(builder, request.body.as_ref())?;
    let response = octocrab.execute(http_request).await?;

    let status = response.status().as_u16();
    let text = octocrab.body_to_string(response).await?;
    Ok(ApiResponse::new(status, decode_body(&text)))
}

/// Decodes a response body, tolerating empty and non-JSON bodies.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
