// File: ./src/model/due.rs
// Request and response shapes of a due-date update
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// What a due-date update asks the remote service to set.
///
/// Exactly one representation travels per request: a free-text expression for the
/// service to resolve, or a structured date, or a structured date-time. Being an enum,
/// a request carrying both a due-string and a structured date cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueUpdateRequest {
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl DueUpdateRequest {
    pub fn from_text(due_string: &str) -> Self {
        Self::Text(due_string.to_string())
    }
}

// Serializes to a single-key object. The language field is never sent so the
// service falls back to the account's default language.
impl Serialize for DueUpdateRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Text(text) => map.serialize_entry("due_string", text)?,
            Self::Date(date) => {
                map.serialize_entry("due_date", &date.format("%Y-%m-%d").to_string())?
            }
            Self::DateTime(dt) => map.serialize_entry(
                "due_datetime",
                &dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            )?,
        }
        map.end()
    }
}

/// Due attributes as resolved by the remote service. `None` means cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct ResolvedDueFields {
    pub due_date: Option<NaiveDate>,
    pub due_datetime: Option<DateTime<Utc>>,
    pub is_recurring: bool,
    pub deadline: Option<NaiveDate>,
}

impl ResolvedDueFields {
    pub fn is_cleared(&self) -> bool {
        self.due_date.is_none() && self.due_datetime.is_none()
    }

    /// Short human-readable form used in status messages and the task list.
    pub fn describe(&self) -> String {
        let mut s = match (self.due_datetime, self.due_date) {
            (Some(dt), _) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
            (None, Some(d)) => d.format("%Y-%m-%d").to_string(),
            (None, None) => "no date".to_string(),
        };
        if self.is_recurring {
            s.push_str(" (recurring)");
        }
        if let Some(deadline) = self.deadline {
            s.push_str(&format!(" [deadline {}]", deadline.format("%Y-%m-%d")));
        }
        s
    }
}
