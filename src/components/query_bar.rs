use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const PROMPT: &str = " Search: ";

/// Top line holding the editable query.
///
/// When the query is wider than the line it scrolls horizontally so the
/// cursor stays in view.
pub struct QueryBarWidget<'a> {
    input: &'a str,
    /// Byte offset of the cursor in `input`.
    cursor: usize,
    theme: &'a ThemeColors,
}

impl<'a> QueryBarWidget<'a> {
    pub fn new(input: &'a str, cursor: usize, theme: &'a ThemeColors) -> Self {
        Self {
            input,
            cursor: cursor.min(input.len()),
            theme,
        }
    }

    /// Characters hidden off the left edge and the cursor's column within
    /// the input field.
    fn scroll(&self, field_width: usize) -> (usize, usize) {
        let cursor_chars = self
            .input
            .char_indices()
            .take_while(|(i, _)| *i < self.cursor)
            .count();
        let skip = cursor_chars.saturating_sub(field_width.saturating_sub(1));
        (skip, cursor_chars - skip)
    }

    /// Terminal position of the text cursor when drawn into `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let prompt = PROMPT.chars().count() as u16;
        let field = area.width.saturating_sub(prompt) as usize;
        let (_, column) = self.scroll(field);
        let x = (area.x + prompt + column as u16).min(area.right().saturating_sub(1));
        (x, area.y)
    }
}

impl<'a> Widget for QueryBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let prompt_width = PROMPT.chars().count();
        let field = (area.width as usize).saturating_sub(prompt_width);
        let (skip, _) = self.scroll(field);
        let visible: String = self.input.chars().skip(skip).take(field).collect();

        let line = Line::from(vec![
            Span::styled(
                PROMPT,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(visible, Style::default().fg(self.theme.query_fg)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
