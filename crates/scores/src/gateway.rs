//! The boundary the game talks to for high scores.
//!
//! Implementations: [`FileStore`](crate::store::FileStore) (local file, used
//! by the server), [`RemoteGateway`](crate::client::RemoteGateway) (TCP
//! client) and [`CachedGateway`](crate::cache::CachedGateway), a decorator
//! that adds the local fallback to any of them.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::entry::HighScoreEntry;

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Whether the entry made the list.
    pub saved: bool,
    /// The list after the submission (unchanged when `saved` is false).
    pub scores: Vec<HighScoreEntry>,
}

/// Rejection at the gateway boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Score is negative, non-finite or above the ceiling.
    InvalidScore,
}

impl SubmitError {
    /// Wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            SubmitError::InvalidScore => "invalid_score",
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InvalidScore => write!(f, "score rejected: {}", self.code()),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Fetch and submit high scores.
pub trait HighScoreGateway: Send + Sync {
    /// Top `limit` entries, best first.
    fn fetch_top(
        &self,
        limit: usize,
    ) -> impl Future<Output = anyhow::Result<Vec<HighScoreEntry>>> + Send;

    /// Submit a finished score under `name`.
    fn submit(
        &self,
        name: &str,
        score: u64,
    ) -> impl Future<Output = anyhow::Result<SubmitOutcome>> + Send;
}
