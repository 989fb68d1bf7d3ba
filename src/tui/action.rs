use crate::model::TaskRecord;
use uuid::Uuid;

/// Commands emitted by the UI for the background worker (or the UI itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    HideDialog,
    SetTaskDueString(Uuid, String),
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    TasksLoaded(Vec<TaskRecord>),
    DueUpdated { task_id: Uuid, message: String },
    DueFailed { task_id: Uuid, message: String },
    Error(String),
    Status(String),
}
