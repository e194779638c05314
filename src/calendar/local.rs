use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::calendar::CalendarInfo;
use super::event::{CalendarEvent, NewEvent};
use super::store::{CalendarAccessError, CalendarStore};

const DEFAULT_CALENDAR_ID: &str = "personal";

#[derive(Debug, Serialize, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    calendars: Vec<CalendarInfo>,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

impl Default for CalendarFile {
    fn default() -> Self {
        Self {
            calendars: vec![CalendarInfo {
                id: DEFAULT_CALENDAR_ID.to_string(),
                title: "Personal".to_string(),
                source: "Local".to_string(),
            }],
            events: Vec::new(),
        }
    }
}

/// Calendar kept in a TOML file, for systems without EventKit.
///
/// The first calendar in the file is the default one.
pub struct LocalStore {
    path: Option<PathBuf>,
    data: CalendarFile,
}

impl LocalStore {
    /// Open the store at the default location under the user data directory.
    pub fn open() -> Result<Self, CalendarAccessError> {
        let path = default_path().ok_or_else(|| {
            CalendarAccessError::Platform("no data directory on this system".to_string())
        })?;
        Self::open_at(path)
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, CalendarAccessError> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            info!(path = %path.display(), "starting a new local calendar");
            CalendarFile::default()
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: CalendarFile::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub fn add_calendar(&mut self, title: &str) -> String {
        let id = title.to_lowercase();
        self.data.calendars.push(CalendarInfo {
            id: id.clone(),
            title: title.to_string(),
            source: "Local".to_string(),
        });
        id
    }

    fn save(&self) -> Result<(), CalendarAccessError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(&self.data)?)?;
        debug!(path = %path.display(), events = self.data.events.len(), "saved local calendar");
        Ok(())
    }

    fn calendar(&self, id: &str) -> Result<&CalendarInfo, CalendarAccessError> {
        self.data
            .calendars
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CalendarAccessError::UnknownCalendar(id.to_string()))
    }
}

impl CalendarStore for LocalStore {
    fn request_access(&mut self) -> Result<bool, CalendarAccessError> {
        Ok(true)
    }

    fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarAccessError> {
        Ok(self.data.calendars.clone())
    }

    fn default_calendar(&self) -> Result<CalendarInfo, CalendarAccessError> {
        self.data
            .calendars
            .first()
            .cloned()
            .ok_or(CalendarAccessError::NoDefaultCalendar)
    }

    fn events_in_calendar(
        &self,
        calendar_id: &str,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
        self.calendar(calendar_id)?;

        let mut events: Vec<CalendarEvent> = self
            .data
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id && e.start < end && e.end > start)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    fn create_event(
        &mut self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<String, CalendarAccessError> {
        let calendar_name = self.calendar(calendar_id)?.title.clone();
        let id = uuid::Uuid::new_v4().to_string();

        self.data.events.push(CalendarEvent {
            id: id.clone(),
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            is_all_day: false,
            calendar_id: calendar_id.to_string(),
            calendar_name,
            location: event.location.clone(),
            notes: event.notes.clone(),
        });
        self.save()?;
        Ok(id)
    }

    fn delete_event(&mut self, id: &str) -> Result<(), CalendarAccessError> {
        let before = self.data.events.len();
        self.data.events.retain(|e| e.id != id);
        if self.data.events.len() == before {
            return Err(CalendarAccessError::EventNotFound(id.to_string()));
        }
        self.save()
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("event-parser").join("calendar.toml"))
}
