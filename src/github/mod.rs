//! GitHub API client and effect interpreter.
//!
//! This module executes [`GitHubEffect`](crate::effects::GitHubEffect)s
//! through octocrab. It implements the `GitHubInterpreter` trait defined in
//! the effects module.
//!
//! Key features:
//! - HTTP error statuses are returned to the caller as-is, without retry
//! - GraphQL failures are a distinct error from transport failures
//! - One client is shared by every webhook endpoint

mod client;
mod error;
mod interpreter;
mod queries;

pub use client::OctocrabClient;
pub use error::GitHubApiError;
pub use queries::{get_rate_limits, graphql_query};
