//! Effect interpreter trait.
//!
//! Handlers hold the interpreter as `Arc<dyn GitHubInterpreter>`, so the trait
//! uses `async_trait` to stay object safe. Production code uses
//! [`crate::github::OctocrabClient`]; tests use a recording mock.

use async_trait::async_trait;

use super::github::{ApiResponse, GitHubEffect};
use crate::github::GitHubApiError;

/// Interprets GitHub effects against the GitHub API.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct AlwaysNotFound;
///
/// #[async_trait]
/// impl GitHubInterpreter for AlwaysNotFound {
///     async fn interpret(&self, _effect: GitHubEffect) -> Result<ApiResponse, GitHubApiError> {
///         Ok(ApiResponse::new(404, serde_json::json!({"message": "Not Found"})))
///     }
/// }
/// ```
#[async_trait]
pub trait GitHubInterpreter: Send + Sync {
    /// Execute a GitHub effect and return its response.
    ///
    /// Non-2xx statuses are returned in the `Ok` value. `Err` is reserved for
    /// failures to talk to GitHub at all.
    async fn interpret(&self, effect: GitHubEffect) -> Result<ApiResponse, GitHubApiError>;
}
