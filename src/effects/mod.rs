//! Effects-as-data for GitHub operations.
//!
//! Handlers describe the API calls they want as [`GitHubEffect`] values and
//! hand them to a [`GitHubInterpreter`]. This keeps handlers testable against
//! a mock interpreter and gives one place to log outbound calls.

pub mod github;
pub mod interpreter;

pub use github::{ApiResponse, CARDS_PER_PAGE, GitHubEffect, IssueData, ProjectCard};
pub use interpreter::GitHubInterpreter;
