//! GitHub API effect types.
//!
//! These types describe the GitHub API operations the handlers need, as data.
//! An interpreter executes them and hands back an [`ApiResponse`] carrying the
//! raw status code and decoded JSON body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{CardId, ColumnId, RepoId};

/// Largest page GitHub serves for card listings.
pub const CARDS_PER_PAGE: usize = 100;

/// A GitHub API effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitHubEffect {
    // ─── Project cards ────────────────────────────────────────────────────────
    /// Create a note card in a column. GitHub answers 201.
    CreateProjectCard { column_id: ColumnId, note: String },

    /// List one page of the (non-archived) cards of a column, at most
    /// [`CARDS_PER_PAGE`] cards. Pages start at 1.
    ListProjectCards { column_id: ColumnId, page: u32 },

    /// Fetch a single card.
    GetProjectCard { card_id: CardId },

    /// Change a card's note and/or archived flag. `None` leaves a field as is.
    UpdateProjectCard {
        card_id: CardId,
        note: Option<String>,
        archived: Option<bool>,
    },

    /// Move a card to the top of a column. GitHub answers 201.
    MoveProjectCard { card_id: CardId, column_id: ColumnId },

    /// Delete a card. GitHub answers 204 with no body.
    DeleteProjectCard { card_id: CardId },

    // ─── Issues ───────────────────────────────────────────────────────────────
    /// Fetch an issue (or pull request, through the issues endpoint).
    GetIssue { repo: RepoId, number: u64 },

    // ─── Misc ─────────────────────────────────────────────────────────────────
    /// Run a GraphQL query.
    GraphQl { query: String },

    /// Fetch the authenticated user's rate limits.
    GetRateLimits,
}

/// The outcome of an executed effect.
///
/// Non-2xx statuses are carried here unchanged rather than turned into
/// errors; only transport failures become [`crate::github::GitHubApiError`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,

    /// The decoded body. `Null` when GitHub sent no body.
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        ApiResponse { status, body }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}

/// A project card, as returned by the card endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: CardId,

    /// The note text. `None` for cards linked to issue content.
    pub note: Option<String>,

    #[serde(default)]
    pub archived: bool,

    /// API URL of the linked issue or pull request, for content cards.
    pub content_url: Option<String>,
}

/// The subset of an issue the bot looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueData {
    pub number: u64,

    /// `open` or `closed`.
    pub state: String,

    pub html_url: String,
}

impl IssueData {
    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }
}
