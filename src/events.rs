use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// File written by the export key.
pub const EXPORT_PATH: &str = "dpswatch_export.json";

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
    // Windows terminals also report releases
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Limit break visibility
        KeyCode::Char('l') => app.toggle_limit_break(),

        // Export
        KeyCode::Char('e') => match app.export_state(Path::new(EXPORT_PATH)) {
            Ok(()) => app.set_status_message(format!("Exported to {}", EXPORT_PATH)),
            Err(e) => app.set_status_message(format!("Export failed: {}", e)),
        },

        _ => {}
    }
}
