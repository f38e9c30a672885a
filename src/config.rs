//! Bot configuration.
//!
//! Loads configuration from `XDEVBOT_*` environment variables.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::types::ColumnId;

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default timeout for GitHub API calls, in seconds.
pub const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 60;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set to something that cannot be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Bot configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// GitHub personal access token. Unauthenticated when absent.
    pub token: Option<String>,

    /// Webhook secret. Signatures are only checked when this is set.
    pub webhook_secret: Option<Vec<u8>>,

    /// Column that new and reopened items land in.
    pub new_column_id: ColumnId,

    /// Column that closed items move to.
    pub done_column_id: ColumnId,

    /// Columns searched when looking for an item's existing card.
    ///
    /// Empty means "the new and done columns".
    pub board_column_ids: Vec<ColumnId>,

    /// Connect/read timeout for GitHub API calls.
    pub github_timeout: Duration,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let new_column_id = var("XDEVBOT_NEW_COLUMN_ID")
            .ok_or(ConfigError::Missing("XDEVBOT_NEW_COLUMN_ID"))
            .and_then(|v| parse_column("XDEVBOT_NEW_COLUMN_ID", &v))?;
        let done_column_id = var("XDEVBOT_DONE_COLUMN_ID")
            .ok_or(ConfigError::Missing("XDEVBOT_DONE_COLUMN_ID"))
            .and_then(|v| parse_column("XDEVBOT_DONE_COLUMN_ID", &v))?;

        let board_column_ids = match var("XDEVBOT_BOARD_COLUMN_IDS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_column("XDEVBOT_BOARD_COLUMN_IDS", s))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let github_timeout = match var("XDEVBOT_GITHUB_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    var: "XDEVBOT_GITHUB_TIMEOUT_SECS",
                    value: v,
                })?,
            None => Duration::from_secs(DEFAULT_GITHUB_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_address: var("XDEVBOT_BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            token: var("XDEVBOT_TOKEN"),
            webhook_secret: var("XDEVBOT_WEBHOOK_SECRET").map(String::into_bytes),
            new_column_id,
            done_column_id,
            board_column_ids,
            github_timeout,
        })
    }

    /// Returns the columns to search for existing cards.
    pub fn board_columns(&self) -> Vec<ColumnId> {
        if self.board_column_ids.is_empty() {
            vec![self.new_column_id, self.done_column_id]
        } else {
            self.board_column_ids.clone()
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("new_column_id", &self.new_column_id)
            .field("done_column_id", &self.done_column_id)
            .field("board_column_ids", &self.board_column_ids)
            .field("github_timeout", &self.github_timeout)
            .finish()
    }
}

fn parse_column(var: &'static str, value: &str) -> Result<ColumnId, ConfigError> {
    value
        .trim()
        .parse()
        .map(ColumnId)
        .map_err(|_| ConfigError::Invalid {
            var,
            value: value.to_string(),
        })
}
