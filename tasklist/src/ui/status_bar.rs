//! Status bar rendering.

use std::fmt::Write;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Focus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.editing.is_some() {
        "Enter: save | Esc: cancel | Tab: switch field"
    } else {
        match app.focus {
            Focus::Title | Focus::Description => "Enter: add | Tab: switch panel | Esc: quit",
            Focus::List => {
                "↑↓/jk: select | Space: toggle | e: edit | d: delete | r: refresh | x: dismiss | q: quit"
            }
        }
    };

    let state = &app.state;
    let counter = format!("{}/{} done", state.completed_count(), state.tasks.len());

    let sync_text = if state.loading {
        Span::styled("syncing…", theme::pending())
    } else if let Some(at) = state.synced_at {
        let mut text = String::from("synced ");
        // chrono reports a bad user-supplied format as a fmt error.
        if write!(text, "{}", at.format(&app.timestamp_format)).is_err() {
            text = format!("synced {}", at.format("%H:%M:%S"));
        }
        Span::styled(text, theme::muted())
    } else {
        Span::styled("not synced", theme::muted())
    };

    let status_line = Line::from(vec![
        Span::styled(concat!("Tasklist v", env!("CARGO_PKG_VERSION")), theme::emphasis()),
        Span::raw(" | "),
        Span::styled(counter, theme::done()),
        Span::raw(" | "),
        sync_text,
        Span::raw(" | "),
        Span::styled(help_text, theme::muted()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar());
    frame.render_widget(paragraph, area);
}
