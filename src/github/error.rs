//! GitHub API error types.
//!
//! Only failures to reach GitHub, or to make sense of what it sent back, are
//! errors here. An HTTP error status is a normal [`ApiResponse`] and is left
//! to the caller, with one exception: GraphQL queries, whose failures are
//! reported as [`GitHubApiError::GraphQl`].
//!
//! [`ApiResponse`]: crate::effects::ApiResponse

use thiserror::Error;

/// A failure talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubApiError {
    /// The request could not be built or sent, or its body could not be read.
    #[error("GitHub transport error: {0}")]
    Transport(#[from] octocrab::Error),

    /// A GraphQL query failed, either with a non-2xx status or an `errors`
    /// field in the response body.
    #[error("GraphQL query failed (HTTP {status}): {message}")]
    GraphQl { status: u16, message: String },

    /// A 2xx body did not have the expected shape.
    #[error("unexpected GitHub response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl GitHubApiError {
    /// Returns the HTTP status code, if the failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GitHubApiError::GraphQl { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a GraphQL-level failure rather than a
    /// transport problem.
    pub fn is_graphql(&self) -> bool {
        matches!(self, GitHubApiError::GraphQl { .. })
    }
}
