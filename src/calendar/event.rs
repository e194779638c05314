use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    #[serde(default)]
    pub is_all_day: bool,
    pub calendar_id: String,
    #[serde(default)]
    pub calendar_name: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl CalendarEvent {
    pub fn duration_display(&self) -> String {
        if self.is_all_day {
            "All day".to_string()
        } else {
            let start = self.start.format("%H:%M");
            let end = self.end.format("%H:%M");
            format!("{} - {}", start, end)
        }
    }

    pub fn is_future(&self, now: DateTime<Local>) -> bool {
        self.start > now
    }
}

/// Validated fields of an event about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub location: Option<String>,
    pub notes: Option<String>,
}
