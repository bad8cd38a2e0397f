use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::TransferSummary;
use crate::theme::ThemeColors;

const KEY_HINTS: &str = " Enter:search  ^D:download  Esc:clear  ^Q:quit ";

/// Bottom line: result counts, download progress and key hints, or a
/// transient status message.
pub struct StatusBarWidget<'a> {
    summary: &'a str,
    theme: &'a ThemeColors,
    transfers: Option<TransferSummary>,
    selection: Option<&'a str>,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(summary: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            summary,
            theme,
            transfers: None,
            selection: None,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn transfers(mut self, summary: Option<TransferSummary>) -> Self {
        self.transfers = summary;
        self
    }

    /// Full remote path of the highlighted entry.
    pub fn selection(mut self, label: Option<&'a str>) -> Self {
        self.selection = label;
        self
    }
}

/// Format bytes into a short human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn transfer_text(summary: TransferSummary) -> String {
    format!(
        " ↓{} {}/{} ",
        summary.active,
        format_size(summary.bytes),
        format_size(summary.total)
    )
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(row, Style::default().bg(self.theme.status_bg));

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };
            if self.is_error {
                buf.set_style(row, style);
            }
            buf.set_line(area.x, area.y, &Line::from(Span::styled(msg, style)), area.width);
            return;
        }

        let width = area.width as usize;
        let mut spans = vec![Span::styled(
            self.summary.to_string(),
            Style::default().fg(self.theme.status_fg),
        )];
        let mut used = self.summary.chars().count();

        if let Some(summary) = self.transfers {
            let text = transfer_text(summary);
            used += text.chars().count();
            spans.push(Span::styled(
                text,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(label) = self.selection {
            let text = format!(" {label}");
            used += text.chars().count();
            spans.push(Span::styled(text, Style::default().fg(self.theme.info_fg)));
        }

        // Hints only when they fit next to the counts.
        let hints_len = KEY_HINTS.chars().count();
        if used + hints_len <= width {
            spans.push(Span::raw(" ".repeat(width - used - hints_len)));
            spans.push(Span::styled(
                KEY_HINTS,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
