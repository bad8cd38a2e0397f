use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::browser::{DisplayLine, LineKind, Viewport};
use crate::theme::ThemeColors;

/// The visible window of result lines, one row per line.
///
/// Lines are stored untruncated; anything wider than the area is clipped here.
pub struct ResultsWidget<'a> {
    viewport: &'a Viewport,
    theme: &'a ThemeColors,
    placeholder: Option<&'a str>,
}

impl<'a> ResultsWidget<'a> {
    pub fn new(viewport: &'a Viewport, theme: &'a ThemeColors) -> Self {
        Self {
            viewport,
            theme,
            placeholder: None,
        }
    }

    /// Text shown while there is nothing to list.
    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = Some(text);
        self
    }

    fn line_style(&self, line: &DisplayLine) -> Style {
        match line.kind {
            LineKind::Header => Style::default()
                .fg(self.theme.header_fg)
                .add_modifier(Modifier::BOLD),
            LineKind::Directory => Style::default().fg(self.theme.dir_fg),
            LineKind::File => Style::default().fg(self.theme.file_fg),
            LineKind::Separator => Style::default().fg(self.theme.border_fg),
        }
    }
}

impl<'a> Widget for ResultsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(
            area,
            Style::default()
                .bg(self.theme.results_bg)
                .fg(self.theme.results_fg),
        );

        if self.viewport.buffered_lines().is_empty() {
            if let Some(text) = self.placeholder {
                let style = Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC);
                buf.set_line(area.x, area.y, &Line::from(Span::styled(text, style)), area.width);
            }
            return;
        }

        for (row, (line, is_selected)) in self.viewport.render().enumerate() {
            if row >= area.height as usize {
                break;
            }
            let y = area.y + row as u16;

            if line.is_separator() {
                let rule = "─".repeat(area.width as usize);
                let style = self.line_style(line).add_modifier(Modifier::DIM);
                buf.set_line(area.x, y, &Line::from(Span::styled(rule, style)), area.width);
                continue;
            }

            let mut style = self.line_style(line);
            if is_selected {
                style = style
                    .bg(self.theme.selected_bg)
                    .fg(self.theme.selected_fg)
                    .add_modifier(Modifier::BOLD);
                buf.set_style(Rect::new(area.x, y, area.width, 1), style);
            }
            buf.set_line(
                area.x,
                y,
                &Line::from(Span::styled(line.text.as_str(), style)),
                area.width,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::ResultSet;
    use crate::results::build_tree;
    use crate::theme;

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    fn viewport_with(owner: &str, paths: &[&str], height: usize) -> (ResultSet, Viewport) {
        let mut results = ResultSet::new();
        let mut viewport = Viewport::new(height);
        let tree = build_tree(owner, 100, paths).expect("tree");
        viewport.on_result_arrived(&mut results, tree);
        (results, viewport)
    }

    #[test]
    fn renders_header_and_indented_entries() {
        let tc = theme::dark_theme();
        let (_results, viewport) =
            viewport_with("alice", &["d\\a.flac", "d\\b.flac"], 6);

        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        ResultsWidget::new(&viewport, &tc).render(area, &mut buf);

        assert!(row(&buf, 0, 40).starts_with("alice  100 kB/s  (2 files)"));
        assert!(row(&buf, 1, 40).starts_with("  d\\ "));
        assert!(row(&buf, 2, 40).starts_with("    a.flac"));
        assert_eq!(row(&buf, 4, 40), "─".repeat(40));
        assert_eq!(buf.cell((2, 1)).unwrap().fg, tc.dir_fg);
    }

    #[test]
    fn selected_row_is_highlighted_across_width() {
        let tc = theme::dark_theme();
        let (results, mut viewport) = viewport_with("alice", &["d\\a.flac"], 6);
        viewport.select_down(&results);

        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        ResultsWidget::new(&viewport, &tc).render(area, &mut buf);

        assert_eq!(buf.cell((29, 1)).unwrap().bg, tc.selected_bg);
        assert_ne!(buf.cell((29, 0)).unwrap().bg, tc.selected_bg);
    }

    #[test]
    fn long_lines_are_clipped() {
        let tc = theme::dark_theme();
        let long = format!("{}\\song.flac", "x".repeat(80));
        let (_results, viewport) = viewport_with("alice", &[long.as_str()], 4);

        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        ResultsWidget::new(&viewport, &tc).render(area, &mut buf);

        assert_eq!(row(&buf, 1, 20), format!("  {}", "x".repeat(18)));
    }

    #[test]
    fn placeholder_shown_when_empty() {
        let tc = theme::dark_theme();
        let viewport = Viewport::new(5);
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        ResultsWidget::new(&viewport, &tc)
            .placeholder("No results yet")
            .render(area, &mut buf);
        assert!(row(&buf, 0, 30).starts_with("No results yet"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let viewport = Viewport::new(5);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        ResultsWidget::new(&viewport, &tc).render(area, &mut buf);
    }
}
