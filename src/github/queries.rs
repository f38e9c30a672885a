//! Convenience calls built on top of the effect interpreter.

use serde_json::Value;
use tracing::{debug, warn};

use crate::effects::{GitHubEffect, GitHubInterpreter};

use super::error::GitHubApiError;

/// Runs a GraphQL query and returns the decoded response body.
///
/// # Errors
///
/// - [`GitHubApiError::GraphQl`] for a non-2xx status or an `errors` field
///   in the body
/// - [`GitHubApiError::Transport`] if GitHub could not be reached
pub async fn graphql_query(
    github: &dyn GitHubInterpreter,
    query: &str,
) -> Result<Value, GitHubApiError> {
    let response = github
        .interpret(GitHubEffect::GraphQl {
            query: query.to_string(),
        })
        .await?;

    if !response.is_success() {
        return Err(GitHubApiError::GraphQl {
            status: response.status,
            message: error_message(&response.body),
        });
    }

    // GitHub reports query errors with a 200 status.
    if let Some(errors) = response.body.get("errors") {
        return Err(GitHubApiError::GraphQl {
            status: response.status,
            message: errors.to_string(),
        });
    }

    Ok(response.body)
}

/// Fetches the `resources` section of the rate limit endpoint.
///
/// Returns `None` if GitHub answers with anything but 200.
pub async fn get_rate_limits(
    github: &dyn GitHubInterpreter,
) -> Result<Option<Value>, GitHubApiError> {
    let response = github.interpret(GitHubEffect::GetRateLimits).await?;
    if response.status != 200 {
        warn!(status = response.status, "Rate limit request failed");
        return Ok(None);
    }

    let resources = response.body.get("resources").cloned();
    debug!(found = resources.is_some(), "Fetched rate limits");
    Ok(resources)
}

/// Picks a readable message out of an error body.
fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
