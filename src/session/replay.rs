//! Offline session that answers searches from a recorded result library.
//!
//! The library is a JSON array of peers:
//!
//! ```json
//! [{ "user": "alice", "speed": 120, "files": [{ "name": "music\\a.flac", "size": 1024 }] }]
//! ```
//!
//! Every search walks the library in order and sends one response per peer
//! holding a matching file, pausing `pace` between responses the way a real
//! network trickles them in. Downloads advance one `pace` step at a time at
//! the peer's advertised speed.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SearchResult, SearchToken, Session, TransferId, TransferState, TransferUpdate};
use crate::config::Credentials;
use crate::error::SessionError;
use crate::event::Event;

/// Real time between two simulated network steps.
pub const DEFAULT_PACE: Duration = Duration::from_millis(100);

/// Simulated steps per second of transfer time.
const STEPS_PER_SECOND: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
struct LibraryPeer {
    user: String,
    #[serde(default)]
    speed: u32,
    #[serde(default)]
    files: Vec<LibraryFile>,
}

#[derive(Debug, Clone, Deserialize)]
struct LibraryFile {
    name: String,
    #[serde(default)]
    size: u64,
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct ReplaySession {
    peers: Arc<[LibraryPeer]>,
    events: UnboundedSender<Event>,
    response_limit: usize,
    pace: Duration,
    /// The search currently delivering responses.
    running: Option<(SearchToken, AbortOnDrop)>,
    next_transfer: u64,
}

impl ReplaySession {
    /// Log in and load the result library. Without a library every search
    /// comes back empty.
    pub fn connect(
        credentials: &Credentials,
        library: Option<&Path>,
        events: UnboundedSender<Event>,
        response_limit: usize,
    ) -> Result<Self, SessionError> {
        if credentials.user.is_empty() || credentials.password.is_empty() {
            return Err(SessionError::Auth(format!(
                "login rejected for {:?}",
                credentials.user
            )));
        }

        let peers = match library {
            Some(path) => load_library(path)?,
            None => {
                warn!("no result library configured, searches will return nothing");
                Vec::new()
            }
        };
        info!(user = %credentials.user, peers = peers.len(), "session connected");

        Ok(Self {
            peers: peers.into(),
            events,
            response_limit,
            pace: DEFAULT_PACE,
            running: None,
            next_transfer: 0,
        })
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

fn load_library(path: &Path) -> Result<Vec<LibraryPeer>, SessionError> {
    let library_error = |reason: String| SessionError::Library {
        path: path.to_path_buf(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| library_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| library_error(e.to_string()))
}

/// Files of `peer` whose name contains every term, in library order.
fn matching_paths(peer: &LibraryPeer, terms: &[String]) -> Vec<String> {
    peer.files
        .iter()
        .filter(|file| {
            let name = file.name.to_lowercase();
            terms.iter().all(|term| name.contains(term.as_str()))
        })
        .map(|file| file.name.clone())
        .collect()
}

async fn pause(pace: Duration) {
    if pace.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(pace).await;
    }
}

async fn run_search(
    peers: Arc<[LibraryPeer]>,
    terms: Vec<String>,
    token: SearchToken,
    limit: usize,
    pace: Duration,
    events: UnboundedSender<Event>,
) {
    let mut sent = 0;
    for peer in peers.iter() {
        if sent == limit {
            break;
        }
        let paths = matching_paths(peer, &terms);
        if paths.is_empty() {
            continue;
        }
        pause(pace).await;
        let result = SearchResult {
            token,
            owner: peer.user.clone(),
            speed_kbps: peer.speed,
            paths,
        };
        if events.send(Event::SearchResult(result)).is_err() {
            return;
        }
        sent += 1;
    }
    debug!(token = token.value(), responses = sent, "search exhausted");
}

/// Peers advertising no upload speed have no free slot and fail the transfer.
async fn run_transfer(
    mut update: TransferUpdate,
    speed_kbps: u32,
    pace: Duration,
    events: UnboundedSender<Event>,
) {
    if events.send(Event::Transfer(update.clone())).is_err() {
        return;
    }

    if speed_kbps == 0 {
        pause(pace).await;
        update.state = TransferState::Failed(format!("{} has no free upload slot", update.owner));
        let _ = events.send(Event::Transfer(update));
        return;
    }

    let step = (u64::from(speed_kbps) * 1024 / STEPS_PER_SECOND).max(1);
    update.state = TransferState::InProgress;
    while update.bytes < update.total {
        pause(pace).await;
        update.bytes = (update.bytes + step).min(update.total);
        if events.send(Event::Transfer(update.clone())).is_err() {
            return;
        }
    }

    update.state = TransferState::Completed;
    let _ = events.send(Event::Transfer(update));
}

impl Session for ReplaySession {
    fn search(&mut self, query: &str, token: SearchToken) -> Result<(), SessionError> {
        // Dropping the previous handle aborts its task.
        self.running = None;

        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Ok(());
        }

        let task = tokio::spawn(run_search(
            Arc::clone(&self.peers),
            terms,
            token,
            self.response_limit,
            self.pace,
            self.events.clone(),
        ));
        self.running = Some((token, AbortOnDrop(task)));
        Ok(())
    }

    fn cancel(&mut self, token: SearchToken) {
        if self.running.as_ref().is_some_and(|(running, _)| *running == token) {
            debug!(token = token.value(), "search cancelled");
            self.running = None;
        }
    }

    fn download(&mut self, owner: &str, path: &str) -> Result<TransferId, SessionError> {
        let peer = self
            .peers
            .iter()
            .find(|peer| peer.user == owner)
            .ok_or_else(|| SessionError::Transfer(format!("{owner} is not online")))?;
        let file = peer
            .files
            .iter()
            .find(|file| file.name == path)
            .ok_or_else(|| SessionError::Transfer(format!("{owner} does not share {path}")))?;

        self.next_transfer += 1;
        let id = TransferId(self.next_transfer);
        let update = TransferUpdate {
            id,
            owner: owner.to_string(),
            path: path.to_string(),
            bytes: 0,
            total: file.size,
            state: TransferState::Queued,
        };
        info!(owner, path, size = file.size, "download queued");

        tokio::spawn(run_transfer(
            update,
            peer.speed,
            self.pace,
            self.events.clone(),
        ));
        Ok(id)
    }
}
