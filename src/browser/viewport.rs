//! Windowed line buffer over a [`ResultSet`].
//!
//! The buffer always holds the complete flattened lines of a contiguous run
//! of trees, `results[file_offset..file_offset + shown_count()]`. Scrolling
//! past either end of the buffer flattens one more tree at that end and drops
//! trees that have left the window at the other, so each edit costs one
//! tree's worth of lines rather than a full rebuild.

use std::collections::VecDeque;

use super::line::{flatten_into, DisplayLine};
use super::result_set::ResultSet;
use crate::results::{ResultTree, SelectedEntry, TreeWalker};

#[derive(Debug)]
pub struct Viewport {
    lines: Vec<DisplayLine>,
    /// Line count of each buffered tree, front to back.
    spans: VecDeque<usize>,
    /// Index into the result set of the first buffered tree.
    file_offset: usize,
    /// Index into `lines` of the top visible row.
    line_offset: usize,
    /// Highlighted row, relative to `line_offset`.
    selected: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            lines: Vec::with_capacity(height * 2),
            spans: VecDeque::new(),
            file_offset: 0,
            line_offset: 0,
            selected: 0,
            height: height.max(1),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub fn file_offset(&self) -> usize {
        self.file_offset
    }

    #[cfg(test)]
    pub fn shown_count(&self) -> usize {
        self.spans.len()
    }

    #[cfg(test)]
    pub fn line_offset(&self) -> usize {
        self.line_offset
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The whole buffered slice, including rows outside the window.
    pub fn buffered_lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    /// Drop every buffered line and reset the window to the top.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.spans.clear();
        self.file_offset = 0;
        self.line_offset = 0;
        self.selected = 0;
    }

    /// Insert a freshly built tree and update the window if it is affected.
    /// Returns the tree's index in `results`.
    pub fn on_result_arrived(&mut self, results: &mut ResultSet, tree: ResultTree) -> usize {
        let pos = results.insert(tree);
        let results = &*results;
        let spare = self.lines.len() < self.line_offset + self.height;

        if pos <= self.file_offset {
            if spare {
                self.file_offset = pos;
                self.line_offset = 0;
                self.rebuild(results);
            } else {
                // Everything buffered moved down one index.
                self.file_offset += 1;
            }
        } else if spare || pos < self.file_offset + self.spans.len() {
            self.rebuild(results);
        }
        pos
    }

    /// Move the window up one line. Returns `false` at the very top.
    pub fn scroll_up(&mut self, results: &ResultSet) -> bool {
        let moved = self.shift_up(results);
        self.fix_selection();
        moved
    }

    /// Move the window down one line. Returns `false` at the very bottom.
    pub fn scroll_down(&mut self, results: &ResultSet) -> bool {
        if self.height == 1 && !self.lines.is_empty() {
            // A one-row window hops over the separator below it, or stays put
            // when that separator closes the last tree.
            let next = self.line_offset + 1;
            if !self.ensure_line(results, next) {
                return false;
            }
            if self.lines[next].is_separator() && !self.ensure_line(results, next + 1) {
                return false;
            }
        }
        let moved = self.shift_down(results);
        if moved && self.height == 1 && self.lines[self.line_offset].is_separator() {
            self.shift_down(results);
        }
        self.fix_selection();
        moved
    }

    /// Move the highlight up one selectable line, scrolling at the top edge.
    pub fn select_up(&mut self, results: &ResultSet) {
        if self.lines.is_empty() || !self.step_up(results) {
            return;
        }
        if self.selected_line().is_some_and(DisplayLine::is_separator) {
            // A separator always follows a tree line, so this cannot fail.
            self.step_up(results);
        }
    }

    /// Move the highlight down one selectable line, scrolling at the bottom edge.
    pub fn select_down(&mut self, results: &ResultSet) {
        if self.lines.is_empty() {
            return;
        }
        let next = self.line_offset + self.selected + 1;
        if !self.ensure_line(results, next) {
            return;
        }
        let steps = if self.lines[next].is_separator() {
            if !self.ensure_line(results, next + 1) {
                return;
            }
            2
        } else {
            1
        };
        for _ in 0..steps {
            self.step_down(results);
        }
    }

    pub fn page_up(&mut self, results: &ResultSet) {
        for _ in 0..self.height {
            self.select_up(results);
        }
    }

    pub fn page_down(&mut self, results: &ResultSet) {
        for _ in 0..self.height {
            self.select_down(results);
        }
    }

    /// Resize the window, refilling or trimming the buffer as needed.
    pub fn set_height(&mut self, results: &ResultSet, height: usize) {
        self.height = height.max(1);
        if self.lines.is_empty() {
            return;
        }
        self.fill(results);
        self.trim_back();
        self.fix_selection();
    }

    /// Visible rows paired with whether each is the highlighted one.
    pub fn render(&self) -> impl Iterator<Item = (&DisplayLine, bool)> + '_ {
        let start = self.line_offset.min(self.lines.len());
        let end = (self.line_offset + self.height).min(self.lines.len());
        self.lines[start..end]
            .iter()
            .enumerate()
            .map(move |(row, line)| (line, row == self.selected))
    }

    /// Result-set index of the highlighted tree and the pre-order index of the
    /// highlighted node within it (0 is the tree's header).
    pub fn selection_target(&self) -> Option<(usize, usize)> {
        let mut index = self.line_offset + self.selected;
        for (shown, &span) in self.spans.iter().enumerate() {
            if index < span {
                if index + 1 == span {
                    return None;
                }
                return Some((self.file_offset + shown, index));
            }
            index -= span;
        }
        None
    }

    /// Owner and remote path of the highlighted line.
    pub fn current_selection_path(&self, results: &ResultSet) -> Option<(String, SelectedEntry)> {
        let (tree_index, node_index) = self.selection_target()?;
        let tree = results.get(tree_index)?;
        let entry = tree.entry_at(node_index, &mut TreeWalker::new())?;
        Some((tree.owner().to_string(), entry))
    }

    /// Owner and every file path at or below the highlighted line.
    pub fn selected_files(&self, results: &ResultSet) -> Option<(String, Vec<String>)> {
        let (tree_index, node_index) = self.selection_target()?;
        let tree = results.get(tree_index)?;
        let files = tree.files_under(node_index, &mut TreeWalker::new());
        Some((tree.owner().to_string(), files))
    }

    // ── Window maintenance ──────────────────────────────────────────────────

    fn selected_line(&self) -> Option<&DisplayLine> {
        self.lines.get(self.line_offset + self.selected)
    }

    fn visible_len(&self) -> usize {
        self.lines
            .len()
            .saturating_sub(self.line_offset)
            .min(self.height)
    }

    fn rebuild(&mut self, results: &ResultSet) {
        self.lines.clear();
        self.spans.clear();
        self.fill(results);
        self.fix_selection();
    }

    /// Append trees until the window is covered or the set runs out.
    fn fill(&mut self, results: &ResultSet) {
        let mut walker = TreeWalker::new();
        while self.lines.len() < self.line_offset + self.height {
            let Some(tree) = results.get(self.file_offset + self.spans.len()) else {
                break;
            };
            let n = flatten_into(tree, &mut walker, &mut self.lines);
            self.spans.push_back(n);
        }
    }

    /// Append trees until `lines[index]` exists.
    fn ensure_line(&mut self, results: &ResultSet, index: usize) -> bool {
        let mut walker = TreeWalker::new();
        while self.lines.len() <= index {
            let Some(tree) = results.get(self.file_offset + self.spans.len()) else {
                return false;
            };
            let n = flatten_into(tree, &mut walker, &mut self.lines);
            self.spans.push_back(n);
        }
        true
    }

    fn shift_up(&mut self, results: &ResultSet) -> bool {
        if self.line_offset == 0 {
            if self.file_offset == 0 {
                return false;
            }
            let Some(tree) = results.get(self.file_offset - 1) else {
                return false;
            };
            let mut block = Vec::new();
            let n = flatten_into(tree, &mut TreeWalker::new(), &mut block);
            self.lines.splice(0..0, block);
            self.spans.push_front(n);
            self.file_offset -= 1;
            self.line_offset = n;
        }
        self.line_offset -= 1;
        self.trim_back();
        true
    }

    fn shift_down(&mut self, results: &ResultSet) -> bool {
        if !self.ensure_line(results, self.line_offset + self.height) {
            return false;
        }
        self.line_offset += 1;
        self.trim_front();
        true
    }

    fn step_up(&mut self, results: &ResultSet) -> bool {
        if self.selected > 0 {
            self.selected -= 1;
            true
        } else {
            self.shift_up(results)
        }
    }

    fn step_down(&mut self, results: &ResultSet) -> bool {
        if self.selected + 1 < self.height {
            self.selected += 1;
            true
        } else {
            self.shift_down(results)
        }
    }

    /// Drop leading trees that lie entirely above the window.
    fn trim_front(&mut self) {
        while self.spans.len() > 1 {
            let first = self.spans[0];
            if first > self.line_offset {
                break;
            }
            self.spans.pop_front();
            self.lines.drain(..first);
            self.line_offset -= first;
            self.file_offset += 1;
        }
    }

    /// Drop trailing trees that lie entirely below the window.
    fn trim_back(&mut self) {
        while self.spans.len() > 1 {
            let Some(&last) = self.spans.back() else { break };
            let start = self.lines.len() - last;
            if start < self.line_offset + self.height {
                break;
            }
            self.spans.pop_back();
            self.lines.truncate(start);
        }
    }

    /// Clamp the window and move the highlight off any separator.
    fn fix_selection(&mut self) {
        if self.lines.is_empty() {
            self.line_offset = 0;
            self.selected = 0;
            return;
        }
        self.line_offset = self.line_offset.min(self.lines.len() - 1);
        let visible = self.visible_len();
        self.selected = self.selected.min(visible - 1);

        if !self.lines[self.line_offset + self.selected].is_separator() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else if visible > 1 {
            self.selected = 1;
        } else {
            // Buffer starts with a header, so a separator is never at index 0.
            self.line_offset -= 1;
        }
    }
}
