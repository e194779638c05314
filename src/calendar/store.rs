use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::warn;

use super::calendar::CalendarInfo;
use super::event::{CalendarEvent, NewEvent};

#[derive(Debug, Error)]
pub enum CalendarAccessError {
    #[error("calendar access was denied")]
    AccessDenied,

    #[error("no default calendar is available")]
    NoDefaultCalendar,

    #[error("unknown calendar: {0}")]
    UnknownCalendar(String),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("calendar rejected the request: {0}")]
    Platform(String),

    #[error("failed to access calendar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("calendar file is malformed: {0}")]
    Format(String),
}

impl From<toml::de::Error> for CalendarAccessError {
    fn from(err: toml::de::Error) -> Self {
        CalendarAccessError::Format(err.to_string())
    }
}

impl From<toml::ser::Error> for CalendarAccessError {
    fn from(err: toml::ser::Error) -> Self {
        CalendarAccessError::Format(err.to_string())
    }
}

/// A calendar backend the app can read from and write to.
///
/// Implementations stay on the UI thread, so they need not be `Send`.
pub trait CalendarStore {
    /// Ask for (or confirm) full access to events.
    fn request_access(&mut self) -> Result<bool, CalendarAccessError>;

    fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarAccessError>;

    /// The calendar new events land in.
    fn default_calendar(&self) -> Result<CalendarInfo, CalendarAccessError>;

    /// Events of one calendar overlapping `[start, end)`.
    fn events_in_calendar(
        &self,
        calendar_id: &str,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError>;

    /// Create an event and return its identifier.
    fn create_event(
        &mut self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<String, CalendarAccessError>;

    fn delete_event(&mut self, id: &str) -> Result<(), CalendarAccessError>;
}

/// Events gathered across every calendar, plus the calendars that failed.
#[derive(Debug, Default)]
pub struct EventListing {
    pub events: Vec<CalendarEvent>,
    pub failed_calendars: Vec<String>,
}

impl EventListing {
    pub fn is_complete(&self) -> bool {
        self.failed_calendars.is_empty()
    }
}

pub fn list_events(
    store: &dyn CalendarStore,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Result<EventListing, CalendarAccessError> {
    let mut listing = EventListing::default();

    for calendar in store.calendars()? {
        match store.events_in_calendar(&calendar.id, start, end) {
            Ok(events) => listing.events.extend(events),
            Err(err) => {
                warn!(calendar = %calendar.title, error = %err, "failed to list calendar events");
                listing.failed_calendars.push(calendar.title);
            }
        }
    }

    listing.events.sort_by_key(|e| e.start);
    Ok(listing)
}
