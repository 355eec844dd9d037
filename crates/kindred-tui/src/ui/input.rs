//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

/// Handle a key press. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit();
            true
        }
        // Re-check the session from the welcome screen, e.g. after signing in elsewhere
        KeyCode::Char('r') if app.current_screen() == Screen::Welcome => {
            app.restart_entry();
            false
        }
        _ => false,
    }
}
