use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // The entry form captures printable keys for its text buffers, so it
    // gets its own handler
    if app.current_view == View::Entry {
        handle_entry_keys(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Board),
        KeyCode::Char('2') => app.set_view(View::Entry),
        KeyCode::Char('3') => app.set_view(View::Risks),

        // Scrolling
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Home => app.board_scroll = 0,

        // Reload history from the backend
        KeyCode::Char('r') => app.reload_data(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("kpi_export.json");
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input in the entry form
fn handle_entry_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        // Save the snapshot
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.save_form();
        }

        // Leave the form
        KeyCode::Esc => app.set_view(View::Board),
        KeyCode::Tab => app.next_view(),
        KeyCode::BackTab => app.prev_view(),

        // Row / field navigation
        KeyCode::Up => app.form.select_prev(1),
        KeyCode::Down | KeyCode::Enter => app.form.select_next(1),
        KeyCode::PageUp => app.form.select_prev(10),
        KeyCode::PageDown => app.form.select_next(10),
        KeyCode::Left => app.form.prev_field(),
        KeyCode::Right => app.form.next_field(),

        // Field editing
        KeyCode::Backspace => app.form.pop_char(),
        KeyCode::Delete => app.form.clear_field(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char(c) => app.form.push_char(c),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Field;
    use crate::catalog::Catalog;
    use crate::data::status::Direction;
    use crate::store::MemoryBackend;

    fn test_app() -> App {
        App::new(Catalog::board_defaults(), Box::new(MemoryBackend::new()))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_tab_cycles_views() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Entry);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Risks);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Board);
    }

    #[test]
    fn test_q_does_not_quit_inside_entry_form() {
        let mut app = test_app();
        app.set_view(View::Entry);
        app.form.clear_field();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running, "'q' must be typed into the field, not quit");

        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.form.rows[0].value, "7");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view, View::Board);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_ctrl_s_saves_form() {
        let mut app = test_app();
        app.set_view(View::Entry);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert_eq!(app.store.len(), 16);
    }

    #[test]
    fn test_arrow_keys_move_form_cursor() {
        let mut app = test_app();
        app.set_view(View::Entry);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.selected_row, 1);
        assert_eq!(app.form.selected_field, Field::Target);
    }

    #[test]
    fn test_space_toggles_direction_field() {
        let mut app = test_app();
        app.set_view(View::Entry);
        app.form.selected_field = Field::Direction;
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.form.rows[0].direction, Direction::Down);
    }

    #[test]
    fn test_any_key_closes_help() {
        let mut app = test_app();
        app.toggle_help();
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.show_help);
        assert!(app.running);
    }
}
