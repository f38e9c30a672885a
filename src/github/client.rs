//! Octocrab client wrapper.
//!
//! `OctocrabClient` owns the `Octocrab` instance the bot shares between both
//! webhook endpoints. Project cards are addressed by global ids, so unlike
//! most GitHub clients it is not scoped to a repository.

use std::time::Duration;

use octocrab::Octocrab;

/// The bot's GitHub API client.
#[derive(Clone)]
pub struct OctocrabClient {
    /// The underlying octocrab client.
    client: Octocrab,
}

impl OctocrabClient {
    /// Wraps a pre-configured Octocrab instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Creates a client, authenticated with a personal token when one is given.
    ///
    /// `timeout` bounds both connecting and reading a response.
    pub fn from_token(token: Option<String>, timeout: Duration) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder()
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout));
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        Ok(Self::new(builder.build()?))
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.client
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient").finish_non_exhaustive()
    }
}
