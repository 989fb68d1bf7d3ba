use crate::model::TaskRecord;
use crate::tui::action::Action;
use crate::tui::dialog::{DialogCommand, DialogState};
use ratatui::widgets::ListState;
use std::collections::HashSet;
use uuid::Uuid;

pub const HELP_MESSAGE: &str = "j/k: Move | D: Due date | q: Quit";

pub struct AppState {
    pub tasks: Vec<TaskRecord>,
    pub list_state: ListState,
    pub message: String,
    pub loading: bool,
    pub dialog: DialogState,
    /// Tasks with a due update on the wire; resubmits for them are refused.
    pub in_flight: HashSet<Uuid>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let mut l_state = ListState::default();
        l_state.select(Some(0));
        Self {
            tasks: vec![],
            list_state: l_state,
            message: HELP_MESSAGE.to_string(),
            loading: true,
            dialog: DialogState::Closed,
            in_flight: HashSet::new(),
        }
    }

    pub fn set_tasks(&mut self, tasks: Vec<TaskRecord>) {
        self.tasks = tasks;
        self.loading = false;
        let sel = self.list_state.selected().unwrap_or(0);
        if self.tasks.is_empty() {
            self.list_state.select(Some(0));
        } else if sel >= self.tasks.len() {
            self.list_state.select(Some(self.tasks.len() - 1));
        }
    }

    pub fn selected_task(&self) -> Option<&TaskRecord> {
        self.list_state
            .selected()
            .and_then(|idx| self.tasks.get(idx))
    }

    pub fn open_due_dialog(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.dialog.handle(DialogCommand::OpenDueDate(id));
            self.message = "Type a date (e.g. next fri). Empty clears it.".to_string();
        }
    }

    /// Feeds the dialog and applies the UI side of the resulting action.
    ///
    /// A submit for a task whose previous update is still on the wire is refused
    /// before it reaches the dialog, so the typed text stays in the buffer.
    pub fn handle_dialog(&mut self, command: DialogCommand) -> Action {
        if command == DialogCommand::Submit
            && let DialogState::DueDate(dialog) = &self.dialog
            && self.in_flight.contains(&dialog.task_id())
        {
            self.message = "Still updating this task, try again shortly.".to_string();
            return Action::None;
        }

        let action = self.dialog.handle(command);
        match &action {
            Action::SetTaskDueString(task_id, _) => {
                self.in_flight.insert(*task_id);
                self.message = "Setting due date...".to_string();
            }
            Action::HideDialog => self.message = "Cancelled.".to_string(),
            Action::None | Action::Quit => {}
        }
        action
    }

    pub fn finish_due_update(&mut self, task_id: Uuid, message: String) {
        self.in_flight.remove(&task_id);
        self.message = message;
    }

    pub fn next(&mut self) {
        let len = self.tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
    pub fn previous(&mut self) {
        let len = self.tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
    pub fn jump_forward(&mut self, step: usize) {
        if self.tasks.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let new_index = (current + step).min(self.tasks.len() - 1);
        self.list_state.select(Some(new_index));
    }
    pub fn jump_backward(&mut self, step: usize) {
        if self.tasks.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let new_index = current.saturating_sub(step);
        self.list_state.select(Some(new_index));
    }
}
