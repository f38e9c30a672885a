//! Newtype wrappers for GitHub identifiers.
//!
//! Project cards and project columns are both addressed by bare integers in
//! GitHub's API; the wrappers keep a card id from being passed where a column
//! id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A project card id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CardId {
    fn from(n: u64) -> Self {
        CardId(n)
    }
}

/// A project column id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub u64);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ColumnId {
    fn from(n: u64) -> Self {
        ColumnId(n)
    }
}

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A GitHub webhook delivery ID (the `X-GitHub-Delivery` header).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl DeliveryId {
    pub fn new(s: impl Into<String>) -> Self {
        DeliveryId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeliveryId {
    fn from(s: String) -> Self {
        DeliveryId(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_id_displays_as_full_name() {
        assert_eq!(RepoId::new("NCAR", "xdev").to_string(), "NCAR/xdev");
    }

    #[test]
    fn card_and_column_ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&CardId(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&ColumnId(10144279)).unwrap(), "10144279");
        let parsed: ColumnId = serde_json::from_str("9388249").unwrap();
        assert_eq!(parsed, ColumnId(9388249));
    }

    #[test]
    fn delivery_id_display() {
        let id = DeliveryId::new("askfjbcalskeuhfaw3r");
        assert_eq!(id.to_string(), "askfjbcalskeuhfaw3r");
        assert_eq!(id.as_str(), "askfjbcalskeuhfaw3r");
    }
}
