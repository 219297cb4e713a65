//! Application state and event handling.
//!
//! [`App`] is pure UI state: it never talks to the network. Key presses that
//! need the server are turned into [`StoreCommand`]s for the caller to send,
//! and the store's snapshots are fed back in through [`App::apply_state`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklist_proto::task::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, Task, TaskId};

use crate::store::TaskListState;
use crate::sync::StoreCommand;

/// Message shown under the title field when it is submitted blank.
pub const TITLE_REQUIRED: &str = "Please enter a task.";

/// Which area receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Title field of the new-task form (default).
    Title,
    /// Description field of the new-task form.
    Description,
    /// The task list.
    List,
}

/// Single-line text field with a character limit.
///
/// The cursor is a character index, not a byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    max_chars: usize,
}

impl TextInput {
    /// Creates an empty field accepting at most `max_chars` characters.
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            max_chars,
        }
    }

    /// Creates a field pre-filled with `value`, cursor at the end.
    #[must_use]
    pub fn with_value(max_chars: usize, value: &str) -> Self {
        let value: String = value.chars().take(max_chars).collect();
        let cursor = value.chars().count();
        Self {
            value,
            cursor,
            max_chars,
        }
    }

    /// Current contents.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of characters entered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Whether the field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Characters still accepted before the limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_chars.saturating_sub(self.len())
    }

    /// Counter text: `"N left"` once something is typed, `"Max N chars"` before.
    #[must_use]
    pub fn hint(&self) -> String {
        if self.is_empty() {
            format!("Max {} chars", self.max_chars)
        } else {
            format!("{} left", self.remaining())
        }
    }

    /// Inserts `c` at the cursor. Returns `false` if the field is full.
    pub fn insert(&mut self, c: char) -> bool {
        if self.remaining() == 0 {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Deletes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Moves the cursor one character left.
    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor one character right.
    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start.
    pub const fn home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor past the last character.
    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Empties the field.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Applies an editing key. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// The new-task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    /// Required title.
    pub title: TextInput,
    /// Optional description.
    pub description: TextInput,
    touched: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: TextInput::new(MAX_TITLE_LENGTH),
            description: TextInput::new(MAX_DESCRIPTION_LENGTH),
            touched: false,
        }
    }
}

impl TaskForm {
    /// Marks the title as visited so a blank value is flagged.
    pub const fn touch(&mut self) {
        self.touched = true;
    }

    /// Whether the "Please enter a task." message should be shown.
    #[must_use]
    pub fn show_error(&self) -> bool {
        self.touched && self.title.value().trim().is_empty()
    }

    /// Submits the form.
    ///
    /// A blank title only flags the field. Otherwise the trimmed values are
    /// returned as an [`StoreCommand::Add`] and the form is reset.
    pub fn submit(&mut self) -> Option<StoreCommand> {
        self.touched = true;
        let title = self.title.value().trim();
        if title.is_empty() {
            return None;
        }

        let command = StoreCommand::Add {
            title: title.to_string(),
            description: non_empty(self.description.value()),
        };
        self.title.clear();
        self.description.clear();
        self.touched = false;
        Some(command)
    }
}

/// Which field of an item being edited has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    /// Title line.
    Title,
    /// Description line.
    Description,
}

/// In-place edit of one listed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    /// Task being edited.
    pub id: TaskId,
    /// Title being edited, pre-filled from the task.
    pub title: TextInput,
    /// Description being edited, pre-filled from the task.
    pub description: TextInput,
    /// Field receiving key presses.
    pub field: EditField,
}

impl EditState {
    /// Starts editing `task` with its current values.
    #[must_use]
    pub fn new(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: TextInput::with_value(MAX_TITLE_LENGTH, &task.title),
            description: TextInput::with_value(MAX_DESCRIPTION_LENGTH, task.description_or_empty()),
            field: EditField::Title,
        }
    }

    /// Builds the update for `current`, or `None` if nothing would change
    /// or the title is blank.
    #[must_use]
    pub fn save(&self, current: &Task) -> Option<StoreCommand> {
        let title = self.title.value().trim();
        let description = self.description.value().trim();
        let changed = title != current.title || description != current.description_or_empty();
        if title.is_empty() || !changed {
            return None;
        }
        Some(StoreCommand::Update {
            id: self.id.clone(),
            title: title.to_string(),
            description: non_empty(description),
        })
    }

    const fn active_input(&mut self) -> &mut TextInput {
        match self.field {
            EditField::Title => &mut self.title,
            EditField::Description => &mut self.description,
        }
    }

    const fn switch_field(&mut self) {
        self.field = match self.field {
            EditField::Title => EditField::Description,
            EditField::Description => EditField::Title,
        };
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Main application state.
pub struct App {
    /// New-task form.
    pub form: TaskForm,
    /// Which area is focused.
    pub focus: Focus,
    /// Index of the highlighted task.
    pub selected: usize,
    /// Item currently in edit mode, if any.
    pub editing: Option<EditState>,
    /// Latest snapshot from the store.
    pub state: TaskListState,
    /// Local notice not coming from the store (e.g. a full command queue).
    pub notice: Option<String>,
    /// chrono format for the "last synced" time.
    pub timestamp_format: String,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app with an empty form focused.
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: TaskForm::default(),
            focus: Focus::Title,
            selected: 0,
            editing: None,
            state: TaskListState::default(),
            notice: None,
            timestamp_format: "%H:%M:%S".to_string(),
            should_quit: false,
        }
    }

    /// Sets the format used for the "last synced" time.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        format.clone_into(&mut self.timestamp_format);
        self
    }

    /// Replaces the rendered snapshot.
    ///
    /// Keeps the selection in range and leaves edit mode if the edited
    /// task is gone.
    pub fn apply_state(&mut self, state: TaskListState) {
        self.state = state;
        self.selected = self
            .selected
            .min(self.state.tasks.len().saturating_sub(1));
        if let Some(edit) = &self.editing
            && self.state.find(&edit.id).is_none()
        {
            self.editing = None;
        }
    }

    /// Shows a local notice in the status area.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// The highlighted task, if the list is not empty.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.state.tasks.get(self.selected)
    }

    /// Handle a key event.
    ///
    /// Returns the store command the key asks for, if any.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.editing.is_some() {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::BackTab => {
                self.cycle_focus_backward();
                return None;
            }
            KeyCode::Tab => {
                self.cycle_focus_forward();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Title | Focus::Description => self.handle_form_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        if key.code == KeyCode::Enter {
            let command = self.form.submit();
            if command.is_some() {
                self.focus = Focus::Title;
                self.notice = None;
            }
            return command;
        }

        let input = match self.focus {
            Focus::Description => &mut self.form.description,
            _ => &mut self.form.title,
        };
        input.handle_key(key);
        None
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.state.tasks.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.selected_task().map(|t| StoreCommand::Toggle(t.id.clone()))
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.selected_task().map(|t| StoreCommand::Remove(t.id.clone()))
            }
            KeyCode::Char('e') => {
                self.editing = self.selected_task().map(EditState::new);
                None
            }
            KeyCode::Char('r') => Some(StoreCommand::Refresh),
            KeyCode::Char('x') => {
                self.notice = None;
                self.state.error.is_some().then_some(StoreCommand::ClearError)
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            _ => None,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        let edit = self.editing.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.editing = None;
                None
            }
            KeyCode::Enter => {
                let edit = self.editing.take()?;
                let current = self.state.find(&edit.id)?;
                edit.save(current)
            }
            KeyCode::Tab | KeyCode::BackTab => {
                edit.switch_field();
                None
            }
            _ => {
                edit.active_input().handle_key(key);
                None
            }
        }
    }

    /// Cycle focus forward: Title -> Description -> List -> Title.
    fn cycle_focus_forward(&mut self) {
        self.leave_focus();
        self.focus = match self.focus {
            Focus::Title => Focus::Description,
            Focus::Description => Focus::List,
            Focus::List => Focus::Title,
        };
    }

    /// Cycle focus backward: Title -> List -> Description -> Title.
    fn cycle_focus_backward(&mut self) {
        self.leave_focus();
        self.focus = match self.focus {
            Focus::Title => Focus::List,
            Focus::List => Focus::Description,
            Focus::Description => Focus::Title,
        };
    }

    const fn leave_focus(&mut self) {
        if matches!(self.focus, Focus::Title) {
            self.form.touch();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
