// File: ./src/model/item.rs
use crate::model::due::ResolvedDueFields;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task as persisted by the local store.
///
/// `id` is the local identity used by the UI and the store, `remote_id` is the
/// identifier the remote task service knows the task by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub remote_id: String,
    pub content: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl TaskRecord {
    pub fn new(remote_id: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            remote_id: remote_id.to_string(),
            content: content.to_string(),
            due_date: None,
            due_datetime: None,
            is_recurring: false,
            deadline: None,
        }
    }

    pub fn due_fields(&self) -> ResolvedDueFields {
        ResolvedDueFields {
            due_date: self.due_date,
            due_datetime: self.due_datetime,
            is_recurring: self.is_recurring,
            deadline: self.deadline,
        }
    }

    /// Overwrites all four due attributes, clears included.
    pub fn apply_due_fields(&mut self, fields: &ResolvedDueFields) {
        self.due_date = fields.due_date;
        self.due_datetime = fields.due_datetime;
        self.is_recurring = fields.is_recurring;
        self.deadline = fields.deadline;
    }
}
