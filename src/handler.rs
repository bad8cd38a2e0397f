use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::session::Session;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent, session: &mut dyn Session) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => app.quit(),
        KeyCode::Char('d') if ctrl => app.download_selection(session),
        KeyCode::F(5) => app.download_selection(session),

        KeyCode::Enter => app.submit_search(session),
        KeyCode::Esc => app.clear_query(),

        KeyCode::Up if ctrl => app.scroll_up(),
        KeyCode::Down if ctrl => app.scroll_down(),
        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),

        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Char(c) if !ctrl => app.input_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::RecordingSession;
    use crate::session::SearchResult;
    use crate::theme;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn setup() -> (App, RecordingSession) {
        (App::new(theme::dark_theme(), 12), RecordingSession::default())
    }

    fn press(app: &mut App, session: &mut RecordingSession, keys: &[KeyEvent]) {
        for k in keys {
            handle_key_event(app, *k, session);
        }
    }

    #[test]
    fn typing_edits_the_query() {
        let (mut app, mut session) = setup();
        let keys: Vec<KeyEvent> = "evoken".chars().map(|c| key(KeyCode::Char(c))).collect();
        press(&mut app, &mut session, &keys);
        press(
            &mut app,
            &mut session,
            &[key(KeyCode::Backspace), key(KeyCode::Home), key(KeyCode::Delete)],
        );
        assert_eq!(app.query.input, "voke");
        assert_eq!(app.query.cursor_position, 0);
    }

    #[test]
    fn shifted_chars_are_typed() {
        let (mut app, mut session) = setup();
        let upper = KeyEvent::new(KeyCode::Char('E'), KeyModifiers::SHIFT);
        press(&mut app, &mut session, &[upper]);
        assert_eq!(app.query.input, "E");
    }

    #[test]
    fn control_chars_are_not_typed() {
        let (mut app, mut session) = setup();
        press(&mut app, &mut session, &[ctrl('x')]);
        assert!(app.query.input.is_empty());
    }

    #[test]
    fn enter_submits_and_esc_clears() {
        let (mut app, mut session) = setup();
        press(
            &mut app,
            &mut session,
            &[key(KeyCode::Char('a')), key(KeyCode::Enter), key(KeyCode::Esc)],
        );
        assert_eq!(session.searches.len(), 1);
        assert_eq!(session.searches[0].0, "a");
        assert!(app.query.input.is_empty());
        assert_eq!(app.active_query.as_deref(), Some("a"));
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        let (mut app, mut session) = setup();
        press(&mut app, &mut session, &[ctrl('c')]);
        assert!(app.should_quit);

        let (mut app, mut session) = setup();
        press(&mut app, &mut session, &[ctrl('q')]);
        assert!(app.should_quit);
    }

    #[test]
    fn plain_q_is_typed_not_quit() {
        let (mut app, mut session) = setup();
        press(&mut app, &mut session, &[key(KeyCode::Char('q'))]);
        assert!(!app.should_quit);
        assert_eq!(app.query.input, "q");
    }

    #[test]
    fn arrows_move_selection_and_f5_downloads() {
        let (mut app, mut session) = setup();
        app.handle_search_result(SearchResult {
            token: app.search_token,
            owner: "alice".into(),
            speed_kbps: 100,
            paths: vec!["d\\a.flac".into(), "d\\b.flac".into()],
        });

        press(
            &mut app,
            &mut session,
            &[key(KeyCode::Down), key(KeyCode::Down), key(KeyCode::Down)],
        );
        assert_eq!(app.viewport.selected(), 3);
        press(&mut app, &mut session, &[key(KeyCode::Up), key(KeyCode::F(5))]);

        assert_eq!(
            session.downloads,
            vec![("alice".to_string(), "d\\a.flac".to_string())]
        );

        press(&mut app, &mut session, &[key(KeyCode::PageUp), ctrl('d')]);
        assert_eq!(session.downloads.len(), 3);
    }
}
