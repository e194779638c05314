use std::sync::mpsc;

use block2::RcBlock;
use chrono::{DateTime, Local, TimeZone};
use objc2::rc::Retained;
use objc2::runtime::Bool;
use objc2_event_kit::{
    EKAuthorizationStatus, EKCalendar, EKEntityType, EKEvent, EKEventStore, EKSpan,
};
use objc2_foundation::{NSArray, NSDate, NSError, NSString};
use tracing::debug;

use super::calendar::CalendarInfo;
use super::event::{CalendarEvent, NewEvent};
use super::store::{CalendarAccessError, CalendarStore};

/// Seconds between Unix epoch (1970-01-01) and NSDate reference date (2001-01-01)
const NSDATE_UNIX_OFFSET: f64 = 978307200.0;

/// Apple Calendar via EventKit.
pub struct EventKitStore {
    store: Retained<EKEventStore>,
}

impl EventKitStore {
    pub fn new() -> Self {
        let store = unsafe { EKEventStore::new() };
        Self { store }
    }

    pub fn authorization_status() -> EKAuthorizationStatus {
        unsafe { EKEventStore::authorizationStatusForEntityType(EKEntityType::Event) }
    }

    fn calendar_by_id(&self, id: &str) -> Result<Retained<EKCalendar>, CalendarAccessError> {
        let ns_id = NSString::from_str(id);
        unsafe { self.store.calendarWithIdentifier(&ns_id) }
            .ok_or_else(|| CalendarAccessError::UnknownCalendar(id.to_string()))
    }
}

impl Default for EventKitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarStore for EventKitStore {
    fn request_access(&mut self) -> Result<bool, CalendarAccessError> {
        match Self::authorization_status() {
            EKAuthorizationStatus::FullAccess => return Ok(true),
            EKAuthorizationStatus::Denied | EKAuthorizationStatus::Restricted => {
                return Ok(false);
            }
            _ => {}
        }

        let (tx, rx) = mpsc::channel();
        let block = RcBlock::new(move |granted: Bool, _error: *mut NSError| {
            let _ = tx.send(granted.as_bool());
        });

        unsafe {
            self.store
                .requestFullAccessToEventsWithCompletion(&*block as *const _ as *mut _);
        }

        rx.recv().map_err(|_| {
            CalendarAccessError::Platform("no response to the calendar access request".to_string())
        })
    }

    fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarAccessError> {
        let ek_calendars = unsafe { self.store.calendarsForEntityType(EKEntityType::Event) };

        let mut calendars = Vec::new();
        for i in 0..ek_calendars.len() {
            let cal = ek_calendars.objectAtIndex(i);
            calendars.push(calendar_info(&cal));
        }

        Ok(calendars)
    }

    fn default_calendar(&self) -> Result<CalendarInfo, CalendarAccessError> {
        unsafe { self.store.defaultCalendarForNewEvents() }
            .map(|cal| calendar_info(&cal))
            .ok_or(CalendarAccessError::NoDefaultCalendar)
    }

    fn events_in_calendar(
        &self,
        calendar_id: &str,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
        let calendar = self.calendar_by_id(calendar_id)?;
        let calendars = NSArray::from_retained_slice(&[calendar]);

        let ns_start = datetime_to_nsdate(&start);
        let ns_end = datetime_to_nsdate(&end);

        let predicate = unsafe {
            self.store.predicateForEventsWithStartDate_endDate_calendars(
                &ns_start,
                &ns_end,
                Some(&calendars),
            )
        };

        let ek_events = unsafe { self.store.eventsMatchingPredicate(&predicate) };
        let mut events = Vec::new();

        for i in 0..ek_events.len() {
            let ev = ek_events.objectAtIndex(i);
            events.push(convert_event(&ev));
        }

        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    fn create_event(
        &mut self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<String, CalendarAccessError> {
        let calendar = self.calendar_by_id(calendar_id)?;

        let title = NSString::from_str(&event.title);
        let start = datetime_to_nsdate(&event.start);
        let end = datetime_to_nsdate(&event.end);
        let location = event.location.as_deref().map(NSString::from_str);
        let notes = event.notes.as_deref().map(NSString::from_str);

        let ek_event = unsafe { EKEvent::eventWithEventStore(&self.store) };
        unsafe {
            ek_event.setTitle(Some(&title));
            ek_event.setStartDate(Some(&start));
            ek_event.setEndDate(Some(&end));
            ek_event.setLocation(location.as_deref());
            ek_event.setNotes(notes.as_deref());
            ek_event.setCalendar(Some(&calendar));

            self.store
                .saveEvent_span_error(&ek_event, EKSpan::ThisEvent)
                .map_err(|err| platform_error(&err))?;
        }

        let id = unsafe {
            ek_event
                .eventIdentifier()
                .map(|s| s.to_string())
                .unwrap_or_default()
        };
        debug!(%id, "saved event to EventKit");
        Ok(id)
    }

    fn delete_event(&mut self, id: &str) -> Result<(), CalendarAccessError> {
        let ns_id = NSString::from_str(id);
        let ek_event = unsafe { self.store.eventWithIdentifier(&ns_id) }
            .ok_or_else(|| CalendarAccessError::EventNotFound(id.to_string()))?;

        unsafe {
            self.store
                .removeEvent_span_error(&ek_event, EKSpan::ThisEvent)
                .map_err(|err| platform_error(&err))
        }
    }
}

fn calendar_info(cal: &EKCalendar) -> CalendarInfo {
    let id = unsafe { cal.calendarIdentifier().to_string() };
    let title = unsafe { cal.title().to_string() };
    let source = unsafe {
        cal.source()
            .map(|s| s.title().to_string())
            .unwrap_or_default()
    };
    CalendarInfo { id, title, source }
}

fn convert_event(ev: &EKEvent) -> CalendarEvent {
    let id = unsafe {
        ev.eventIdentifier()
            .map(|s| s.to_string())
            .unwrap_or_default()
    };
    let title = unsafe { ev.title().to_string() };
    let start = unsafe { nsdate_to_datetime(&ev.startDate()) };
    let end = unsafe { nsdate_to_datetime(&ev.endDate()) };
    let is_all_day = unsafe { ev.isAllDay() };
    let location = unsafe { ev.location().map(|s| s.to_string()) };
    let notes = unsafe { ev.notes().map(|s| s.to_string()) };
    let (calendar_id, calendar_name) = unsafe {
        ev.calendar()
            .map(|cal| (cal.calendarIdentifier().to_string(), cal.title().to_string()))
            .unwrap_or_else(|| (String::new(), "Unknown".to_string()))
    };

    CalendarEvent {
        id,
        title,
        start,
        end,
        is_all_day,
        calendar_id,
        calendar_name,
        location,
        notes,
    }
}

fn platform_error(err: &NSError) -> CalendarAccessError {
    CalendarAccessError::Platform(err.localizedDescription().to_string())
}

fn datetime_to_nsdate(dt: &DateTime<Local>) -> Retained<NSDate> {
    let unix_ts = dt.timestamp() as f64;
    let nsdate_ts = unix_ts - NSDATE_UNIX_OFFSET;
    NSDate::dateWithTimeIntervalSinceReferenceDate(nsdate_ts)
}

fn nsdate_to_datetime(date: &NSDate) -> DateTime<Local> {
    let nsdate_ts = date.timeIntervalSinceReferenceDate();
    let unix_ts = (nsdate_ts + NSDATE_UNIX_OFFSET) as i64;
    Local
        .timestamp_opt(unix_ts, 0)
        .single()
        .unwrap_or_else(Local::now)
}
