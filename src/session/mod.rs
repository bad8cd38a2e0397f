//! Seam between the UI and the file-sharing network.
//!
//! A session delivers everything asynchronously through the event channel:
//! search responses arrive as [`Event::SearchResult`](crate::event::Event)
//! tagged with the [`SearchToken`] they answer, and transfer progress arrives
//! as [`Event::Transfer`](crate::event::Event). The UI thread never waits on
//! the network.

pub mod replay;

pub use replay::ReplaySession;

use crate::error::SessionError;

/// Generation counter identifying one submitted search.
///
/// Responses carry the token of the search they answer so the consumer can
/// discard anything that belongs to a search it has already replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchToken(u64);

impl SearchToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// One peer's answer to a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub token: SearchToken,
    pub owner: String,
    pub speed_kbps: u32,
    /// Full remote paths, grouped by directory.
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferState {
    Queued,
    InProgress,
    Completed,
    Failed(String),
}

impl TransferState {
    pub fn is_finished(&self) -> bool {
        matches!(self, TransferState::Completed | TransferState::Failed(_))
    }
}

/// Progress snapshot of a single download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferUpdate {
    pub id: TransferId,
    pub owner: String,
    pub path: String,
    pub bytes: u64,
    pub total: u64,
    pub state: TransferState,
}

/// Operations the UI issues against the network.
pub trait Session {
    /// Start a search. Responses for `token` follow on the event channel
    /// until the search is cancelled or runs out of peers.
    fn search(&mut self, query: &str, token: SearchToken) -> Result<(), SessionError>;

    /// Stop delivering responses for `token`. Unknown tokens are ignored.
    fn cancel(&mut self, token: SearchToken);

    /// Queue a download of `path` from `owner`.
    fn download(&mut self, owner: &str, path: &str) -> Result<TransferId, SessionError>;
}
