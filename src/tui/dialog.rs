// Modal single-line input dialogs
use crate::model::due_string_for_submit;
use crate::tui::action::Action;
use uuid::Uuid;

/// A line of typed text with a cursor counted in characters (`0..=len`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    pub fn text(&self) -> &str {
        &self.buffer
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor.saturating_sub(1);
        self.cursor = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor.saturating_add(1);
        self.cursor = self.clamp_cursor(cursor_moved_right);
    }
    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }
    pub fn move_cursor_end(&mut self) {
        self.cursor = self.len();
    }
    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.buffer.insert(index, new_char);
        self.move_cursor_right();
    }
    /// Backspace.
    pub fn delete_char(&mut self) {
        if self.cursor != 0 {
            let current_index = self.cursor;
            let from_left_to_current_index = current_index - 1;
            let before_char_to_delete = self.buffer.chars().take(from_left_to_current_index);
            let after_char_to_delete = self.buffer.chars().skip(current_index);
            self.buffer = before_char_to_delete.chain(after_char_to_delete).collect();
            self.move_cursor_left();
        }
    }
    /// Forward delete; the cursor stays put.
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.len() {
            let before = self.buffer.chars().take(self.cursor);
            let after = self.buffer.chars().skip(self.cursor + 1);
            self.buffer = before.chain(after).collect();
        }
    }
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.buffer.len())
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Editing behavior shared by every text-entry dialog.
pub trait LineEditor {
    fn input(&self) -> &TextInput;
    fn input_mut(&mut self) -> &mut TextInput;

    fn apply_edit(&mut self, op: EditOp) {
        let input = self.input_mut();
        match op {
            EditOp::Insert(c) => input.enter_char(c),
            EditOp::Backspace => input.delete_char(),
            EditOp::Delete => input.delete_char_forward(),
            EditOp::Left => input.move_cursor_left(),
            EditOp::Right => input.move_cursor_right(),
            EditOp::Home => input.move_cursor_home(),
            EditOp::End => input.move_cursor_end(),
        }
    }
}

/// Free-text due date entry for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateDialog {
    task_id: Uuid,
    input: TextInput,
}

impl DueDateDialog {
    pub fn new(task_id: Uuid) -> Self {
        Self {
            task_id,
            input: TextInput::default(),
        }
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    /// Empty or whitespace-only input clears the due date.
    pub fn submit(self) -> Action {
        Action::SetTaskDueString(self.task_id, due_string_for_submit(self.input.text()))
    }
}

impl LineEditor for DueDateDialog {
    fn input(&self) -> &TextInput {
        &self.input
    }
    fn input_mut(&mut self) -> &mut TextInput {
        &mut self.input
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogCommand {
    OpenDueDate(Uuid),
    Edit(EditOp),
    Cancel,
    Submit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    DueDate(DueDateDialog),
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn editor(&self) -> Option<&dyn LineEditor> {
        match self {
            Self::Closed => None,
            Self::DueDate(dialog) => Some(dialog),
        }
    }

    fn editor_mut(&mut self) -> Option<&mut dyn LineEditor> {
        match self {
            Self::Closed => None,
            Self::DueDate(dialog) => Some(dialog),
        }
    }

    /// Drives the automaton. Never blocks and never talks to the service; the
    /// returned action is for the caller to route.
    pub fn handle(&mut self, command: DialogCommand) -> Action {
        match command {
            DialogCommand::OpenDueDate(task_id) => {
                *self = Self::DueDate(DueDateDialog::new(task_id));
                Action::None
            }
            DialogCommand::Edit(op) => {
                if let Some(editor) = self.editor_mut() {
                    editor.apply_edit(op);
                }
                Action::None
            }
            DialogCommand::Cancel => match std::mem::take(self) {
                Self::Closed => Action::None,
                Self::DueDate(_) => Action::HideDialog,
            },
            DialogCommand::Submit => match std::mem::take(self) {
                Self::Closed => Action::None,
                Self::DueDate(dialog) => dialog.submit(),
            },
        }
    }
}
