//! Terminal UI rendering.

pub mod form;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let notices = notice_lines(app);
    let notice_height = u16::try_from(notices.len()).unwrap_or(u16::MAX);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),           // Header
            Constraint::Length(form::HEIGHT), // Form
            Constraint::Length(notice_height), // Loading / error
            Constraint::Min(3),              // Task list
            Constraint::Length(1),           // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    form::render(frame, chunks[1], app);
    frame.render_widget(Paragraph::new(notices), chunks[2]);
    task_list::render(frame, chunks[3], app);
    status_bar::render(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled("Todo List", theme::title())),
        Line::from(Span::styled(
            "Get things done, one task at a time.",
            theme::muted(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

/// Loading indicator, store error and local notice, in that order.
fn notice_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if app.state.loading {
        lines.push(Line::from(Span::styled(
            "Loading tasks...",
            theme::pending(),
        )));
    }
    if let Some(error) = &app.state.error {
        lines.push(Line::from(vec![
            Span::styled(error.as_str(), theme::error()),
            Span::styled("  (x to dismiss)", theme::muted()),
        ]));
    }
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            theme::pending(),
        )));
    }
    lines
}
