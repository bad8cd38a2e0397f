use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{viewport_height, App};
use crate::components::query_bar::QueryBarWidget;
use crate::components::results::ResultsWidget;
use crate::components::status_bar::StatusBarWidget;

/// Render the application UI: query line, result window, status line.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    if app.viewport.height() != viewport_height(area.height) {
        app.resize(area.height);
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let query = QueryBarWidget::new(&app.query.input, app.query.cursor_position, &app.theme);
    let (cursor_x, cursor_y) = query.cursor_position(chunks[0]);
    frame.render_widget(query, chunks[0]);
    frame.set_cursor_position((cursor_x, cursor_y));

    let placeholder = if app.active_query.is_some() {
        "Waiting for peers..."
    } else {
        "Type a query and press Enter"
    };
    frame.render_widget(
        ResultsWidget::new(&app.viewport, &app.theme).placeholder(placeholder),
        chunks[1],
    );

    let summary = summary_text(app);
    let selection = app.selection_label();
    let mut status = StatusBarWidget::new(&summary, &app.theme)
        .transfers(app.transfer_summary())
        .selection(selection.as_deref());
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg, app.status_is_error);
    }
    frame.render_widget(status, chunks[2]);
}

/// Left side of the status line.
fn summary_text(app: &App) -> String {
    let Some(query) = &app.active_query else {
        return " simpleseek".to_string();
    };
    if app.results.is_empty() && app.dropped_results == 0 {
        return format!(" {query}: no results yet");
    }
    let peers = app.results.len();
    let mut text = format!(
        " {query}: {peers} {}, {} files",
        if peers == 1 { "peer" } else { "peers" },
        app.results.total_files()
    );
    if app.dropped_results > 0 {
        text.push_str(&format!(", {} dropped", app.dropped_results));
    }
    text
}
