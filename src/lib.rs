//! xdevbot - A GitHub bot that keeps a project board in sync with the issues
//! and pull requests of watched repositories.
//!
//! This library provides the webhook parsing, routing and handlers, plus the
//! HTTP server that hosts them.

pub mod config;
pub mod effects;
pub mod github;
pub mod notes;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_utils;
