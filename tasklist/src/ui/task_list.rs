//! Task list rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tasklist_proto::task::Task;

use super::form::with_cursor;
use super::theme;
use crate::app::{App, EditField, EditState, Focus};

/// Render the task list, or the empty-state message when there are no tasks.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::List || app.editing.is_some();
    let tasks = &app.state.tasks;

    let block = Block::default()
        .title(Span::styled(
            format!("Tasks ({})", tasks.len()),
            theme::title(),
        ))
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    if tasks.is_empty() {
        let text = vec![
            Line::from(Span::styled("No tasks yet!", theme::emphasis())),
            Line::from(Span::styled("Add a task to get started.", theme::muted())),
        ];
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| match &app.editing {
            Some(edit) if edit.id == task.id => edit_item(task, edit),
            _ => task_item(task),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if app.editing.is_some() {
            theme::text()
        } else {
            theme::selected()
        })
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// A task as a checkbox line plus an optional description line.
fn task_item(task: &Task) -> ListItem<'_> {
    let (checkbox, style) = if task.completed {
        ("[✓]", theme::completed())
    } else {
        ("[ ]", theme::text())
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(checkbox, style),
        Span::raw(" "),
        Span::styled(task.title.as_str(), style),
    ])];
    if let Some(description) = &task.description {
        let style = if task.completed {
            theme::completed()
        } else {
            theme::muted()
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(description.as_str(), style),
        ]));
    }
    ListItem::new(lines)
}

/// A task in edit mode: both fields as inputs with the active one marked.
fn edit_item<'a>(task: &Task, edit: &'a EditState) -> ListItem<'a> {
    let checkbox = if task.completed { "[✓]" } else { "[ ]" };
    let title_active = edit.field == EditField::Title;

    let field_style = |active: bool| {
        if active {
            theme::focused()
        } else {
            theme::text()
        }
    };

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(checkbox, theme::muted()),
            Span::raw(" "),
            Span::styled(with_cursor(&edit.title, title_active), field_style(title_active)),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(
                with_cursor(&edit.description, !title_active),
                field_style(!title_active),
            ),
        ]),
        Line::from(Span::styled(
            "    Enter: save | Esc: cancel | Tab: switch field",
            theme::muted(),
        )),
    ])
}
