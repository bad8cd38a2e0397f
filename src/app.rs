use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::browser::{ResultSet, Viewport};
use crate::error::ResultError;
use crate::results::build_tree;
use crate::session::{SearchResult, SearchToken, Session, TransferId, TransferState, TransferUpdate};
use crate::theme::ThemeColors;

/// Rows taken by the query line and the status line.
pub const CHROME_ROWS: u16 = 2;

/// State of the query input line.
#[derive(Debug, Default)]
pub struct QueryState {
    pub input: String,
    /// Byte offset of the cursor within `input`.
    pub cursor_position: usize,
}

/// Aggregate progress of all unfinished downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub active: usize,
    pub bytes: u64,
    pub total: u64,
}

/// Main application state. Only the event loop mutates it.
pub struct App {
    pub results: ResultSet,
    pub viewport: Viewport,
    pub query: QueryState,
    /// Last submitted query, shown while its results stream in.
    pub active_query: Option<String>,
    /// Token of the search whose results are accepted.
    pub search_token: SearchToken,
    /// Responses dropped for malformed paths during the current search.
    pub dropped_results: usize,
    pub transfers: BTreeMap<TransferId, TransferUpdate>,
    pub status_message: Option<(String, Instant)>,
    /// Whether the status message reports a failure.
    pub status_is_error: bool,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

/// Viewport rows left on a terminal `height` rows tall.
pub fn viewport_height(height: u16) -> usize {
    usize::from(height.saturating_sub(CHROME_ROWS)).max(1)
}

impl App {
    pub fn new(theme: ThemeColors, terminal_height: u16) -> Self {
        Self {
            results: ResultSet::new(),
            viewport: Viewport::new(viewport_height(terminal_height)),
            query: QueryState::default(),
            active_query: None,
            search_token: SearchToken::default(),
            dropped_results: 0,
            transfers: BTreeMap::new(),
            status_message: None,
            status_is_error: false,
            should_quit: false,
            theme,
        }
    }

    // ── Query line ──────────────────────────────────────────────────────────

    /// Insert a character at the current cursor position.
    pub fn input_char(&mut self, c: char) {
        self.query.input.insert(self.query.cursor_position, c);
        self.query.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        let before = &self.query.input[..self.query.cursor_position];
        if let Some(prev_char) = before.chars().next_back() {
            self.query.cursor_position -= prev_char.len_utf8();
            self.query.input.remove(self.query.cursor_position);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_char_forward(&mut self) {
        if self.query.cursor_position < self.query.input.len() {
            self.query.input.remove(self.query.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn move_cursor_left(&mut self) {
        let before = &self.query.input[..self.query.cursor_position];
        if let Some(prev_char) = before.chars().next_back() {
            self.query.cursor_position -= prev_char.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn move_cursor_right(&mut self) {
        let after = &self.query.input[self.query.cursor_position..];
        if let Some(next_char) = after.chars().next() {
            self.query.cursor_position += next_char.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.query.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.query.cursor_position = self.query.input.len();
    }

    pub fn clear_query(&mut self) {
        self.query = QueryState::default();
    }

    // ── Searching ───────────────────────────────────────────────────────────

    /// Replace the current search with the query line's contents.
    pub fn submit_search(&mut self, session: &mut dyn Session) {
        let query = self.query.input.trim().to_string();
        if query.is_empty() {
            self.set_status_message("Type something to search for".to_string());
            return;
        }

        session.cancel(self.search_token);
        self.search_token = self.search_token.next();
        self.results.clear();
        self.viewport.clear();
        self.dropped_results = 0;

        info!(%query, token = self.search_token.value(), "search submitted");
        match session.search(&query, self.search_token) {
            Ok(()) => self.active_query = Some(query),
            Err(e) => {
                warn!(error = %e, "search failed");
                self.active_query = None;
                self.set_error_message(format!("Search failed: {e}"));
            }
        }
    }

    /// Ingest one peer response. Responses to replaced searches and
    /// responses that do not form a tree are dropped.
    pub fn handle_search_result(&mut self, result: SearchResult) {
        if result.token != self.search_token {
            debug!(
                owner = %result.owner,
                token = result.token.value(),
                "discarding stale result"
            );
            return;
        }

        match build_tree(&result.owner, result.speed_kbps, &result.paths) {
            Ok(tree) => {
                let files = tree.file_count;
                let pos = self.viewport.on_result_arrived(&mut self.results, tree);
                debug!(owner = %result.owner, files, pos, "result added");
            }
            Err(ResultError::EmptyResult { owner }) => {
                debug!(%owner, "skipping empty result");
            }
            Err(e) => {
                warn!(error = %e, "dropping result");
                self.dropped_results += 1;
            }
        }
    }

    // ── Browsing ────────────────────────────────────────────────────────────

    pub fn select_up(&mut self) {
        self.viewport.select_up(&self.results);
    }

    pub fn select_down(&mut self) {
        self.viewport.select_down(&self.results);
    }

    pub fn page_up(&mut self) {
        self.viewport.page_up(&self.results);
    }

    pub fn page_down(&mut self) {
        self.viewport.page_down(&self.results);
    }

    /// Move the window without moving the highlight off its line, unless
    /// that line leaves the window.
    pub fn scroll_up(&mut self) {
        self.viewport.scroll_up(&self.results);
    }

    pub fn scroll_down(&mut self) {
        self.viewport.scroll_down(&self.results);
    }

    /// Owner and remote path of the highlighted entry.
    pub fn selection_label(&self) -> Option<String> {
        let (owner, entry) = self.viewport.current_selection_path(&self.results)?;
        if entry.path.is_empty() {
            Some(owner)
        } else {
            Some(format!("{owner}: {}", entry.path))
        }
    }

    /// Track a new terminal height.
    pub fn resize(&mut self, terminal_height: u16) {
        self.viewport
            .set_height(&self.results, viewport_height(terminal_height));
    }

    // ── Transfers ───────────────────────────────────────────────────────────

    /// Queue downloads for every file at or below the highlighted line.
    pub fn download_selection(&mut self, session: &mut dyn Session) {
        let Some((owner, files)) = self.viewport.selected_files(&self.results) else {
            self.set_status_message("Nothing selected".to_string());
            return;
        };

        let mut queued = 0;
        let mut failure = None;
        for path in &files {
            match session.download(&owner, path) {
                Ok(id) => {
                    debug!(%owner, %path, id = id.0, "download requested");
                    queued += 1;
                }
                Err(e) => {
                    warn!(%owner, %path, error = %e, "download refused");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            Some(e) => self.set_error_message(format!("Download failed: {e}")),
            None => {
                let noun = if queued == 1 { "file" } else { "files" };
                self.set_status_message(format!("Queued {queued} {noun} from {owner}"));
            }
        }
    }

    pub fn handle_transfer(&mut self, update: TransferUpdate) {
        if !update.state.is_finished() {
            self.transfers.insert(update.id, update);
            return;
        }

        self.transfers.remove(&update.id);
        if let TransferState::Failed(reason) = &update.state {
            warn!(owner = %update.owner, path = %update.path, %reason, "download failed");
            self.set_error_message(format!(
                "Download of {} failed: {reason}",
                file_name(&update.path)
            ));
        } else {
            info!(owner = %update.owner, path = %update.path, "download complete");
            self.set_status_message(format!("Downloaded {}", file_name(&update.path)));
        }
    }

    pub fn transfer_summary(&self) -> Option<TransferSummary> {
        if self.transfers.is_empty() {
            return None;
        }
        Some(TransferSummary {
            active: self.transfers.len(),
            bytes: self.transfers.values().map(|t| t.bytes).sum(),
            total: self.transfers.values().map(|t| t.total).sum(),
        })
    }

    // ── Status line ─────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
        self.status_is_error = false;
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
        self.status_is_error = true;
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
                self.status_is_error = false;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(crate::results::path::SEPARATOR)
        .next()
        .unwrap_or(path)
}
