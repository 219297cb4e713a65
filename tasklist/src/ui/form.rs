//! New-task form rendering (title + description inputs with counters).

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus, TITLE_REQUIRED, TextInput};

/// Rows the form needs: two bordered inputs, each followed by a hint line.
pub const HEIGHT: u16 = 8;

/// Render the form.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let form = &app.form;
    let editing_list = app.editing.is_some();
    let title_focused = app.focus == Focus::Title && !editing_list;
    let description_focused = app.focus == Focus::Description && !editing_list;

    render_input(
        frame,
        chunks[0],
        "New task",
        "Enter a task...",
        &form.title,
        title_focused,
    );
    let title_hint = if form.show_error() {
        Line::from(Span::styled(TITLE_REQUIRED, theme::error()))
    } else {
        Line::from(Span::styled(form.title.hint(), theme::muted()))
    };
    frame.render_widget(Paragraph::new(title_hint), chunks[1]);

    render_input(
        frame,
        chunks[2],
        "Description",
        "Optional description",
        &form.description,
        description_focused,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(form.description.hint(), theme::muted())),
        chunks[3],
    );
}

/// Render one bordered single-line input.
fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    placeholder: &str,
    input: &TextInput,
    focused: bool,
) {
    let line = if input.is_empty() && !focused {
        Line::from(Span::styled(placeholder.to_string(), theme::muted()))
    } else {
        Line::from(Span::styled(with_cursor(input, focused), theme::text()))
    };

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Returns the field text with a block cursor inserted when focused.
pub fn with_cursor(input: &TextInput, focused: bool) -> String {
    if !focused {
        return input.value().to_string();
    }
    let mut text: String = input.value().chars().take(input.cursor()).collect();
    text.push('█');
    text.extend(input.value().chars().skip(input.cursor()));
    text
}
