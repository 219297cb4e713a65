//! Colors and styles for the task list screens.

use ratatui::style::{Color, Modifier, Style};

/// Regular text.
pub const TEXT: Color = Color::White;

/// Descriptions, hints and empty-state text.
pub const MUTED: Color = Color::Gray;

/// Focused input field or panel.
pub const FOCUS: Color = Color::Cyan;

/// Done counter.
pub const DONE: Color = Color::Green;

/// In-flight work and local notices.
pub const PENDING: Color = Color::Yellow;

/// Validation and request failures.
pub const ERROR: Color = Color::Red;

/// Header and panel titles.
pub const TITLE: Color = Color::LightBlue;

#[must_use]
pub fn text() -> Style {
    Style::default().fg(TEXT)
}

#[must_use]
pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

#[must_use]
pub fn emphasis() -> Style {
    text().add_modifier(Modifier::BOLD)
}

/// Header and panel title style.
#[must_use]
pub fn title() -> Style {
    Style::default().fg(TITLE).add_modifier(Modifier::BOLD)
}

/// The field being typed into.
#[must_use]
pub fn focused() -> Style {
    Style::default().fg(FOCUS).add_modifier(Modifier::BOLD)
}

/// The selected row of the task list.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(FOCUS)
        .add_modifier(Modifier::BOLD)
}

/// Title and description of a completed task.
#[must_use]
pub fn completed() -> Style {
    muted().add_modifier(Modifier::CROSSED_OUT)
}

#[must_use]
pub fn done() -> Style {
    Style::default().fg(DONE)
}

/// "Loading tasks...", "syncing…" and busy notices.
#[must_use]
pub fn pending() -> Style {
    Style::default().fg(PENDING)
}

#[must_use]
pub fn error() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

#[must_use]
pub fn border(focused: bool) -> Style {
    if focused { self::focused() } else { text() }
}

#[must_use]
pub fn status_bar() -> Style {
    Style::default().fg(TEXT).bg(Color::Rgb(30, 30, 50))
}
