//! Helpers for reading GitHub references out of project card notes.
//!
//! A card note is free text. The bot only treats whitespace-separated words of
//! the form `https://github.com/<owner>/<repo>/(issues|pull)/<number>` as
//! references to an issue or pull request.

use std::collections::BTreeSet;

use crate::types::RepoId;

/// An issue or pull request referenced from a card note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    /// The repository the item lives in.
    pub repo: RepoId,

    /// The issue or pull request number.
    pub number: u64,
}

/// Extracts the distinct GitHub issue/PR URLs from a note.
///
/// The result is sorted, so repeated calls on the same note agree on order.
///
/// # Examples
///
/// ```
/// use xdevbot::notes::refs_from_note;
///
/// let note = "see https://github.com/NCAR/xdev/issues/5 and \
///             https://github.com/NCAR/xdev/pull/12 \
///             https://github.com/NCAR/xdev/issues/5";
/// assert_eq!(
///     refs_from_note(note),
///     vec![
///         "https://github.com/NCAR/xdev/issues/5".to_string(),
///         "https://github.com/NCAR/xdev/pull/12".to_string(),
///     ]
/// );
///
/// // Trailing segment must be numeric
/// assert!(refs_from_note("https://github.com/NCAR/xdev/issues/new").is_empty());
/// ```
pub fn refs_from_note(note: &str) -> Vec<String> {
    note.split_whitespace()
        .filter(|word| split_ref(word).is_some())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Parses a single issue/PR URL.
///
/// Returns `None` for anything [`refs_from_note`] would not extract, and for
/// signed or oversized numbers that cannot name a real item.
pub fn parse_ref(word: &str) -> Option<IssueRef> {
    let (owner, repo, _, number) = split_ref(word)?;
    Some(IssueRef {
        repo: RepoId::new(owner, repo),
        number: number.parse().ok()?,
    })
}

/// Splits a reference into owner, repo, kind and number segments.
fn split_ref(word: &str) -> Option<(&str, &str, &str, &str)> {
    let segments: Vec<&str> = word.split('/').collect();
    let [scheme, empty, host, owner, repo, kind, number] = segments.as_slice() else {
        return None;
    };

    if !matches!(*scheme, "http:" | "https:") || !empty.is_empty() || *host != "github.com" {
        return None;
    }
    if !matches!(*kind, "issues" | "pull") || !is_integer(number) {
        return None;
    }

    Some((*owner, *repo, *kind, *number))
}

/// Returns the `owner/repo` suffix of a repository URL.
///
/// ```
/// use xdevbot::notes::repo_fullname_from_url;
///
/// assert_eq!(repo_fullname_from_url("https://github.com/NCAR/xdev"), "NCAR/xdev");
/// ```
pub fn repo_fullname_from_url(url: &str) -> String {
    let segments: Vec<&str> = url.split('/').collect();
    let start = segments.len().saturating_sub(2);
    segments[start..].join("/")
}

/// An optionally signed run of ASCII digits.
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
