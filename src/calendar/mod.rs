pub mod calendar;
pub mod event;
#[cfg(target_os = "macos")]
pub mod eventkit;
pub mod local;
pub mod store;

pub use calendar::CalendarInfo;
pub use event::{CalendarEvent, NewEvent};
#[cfg(target_os = "macos")]
pub use eventkit::EventKitStore;
pub use local::LocalStore;
pub use store::{list_events, CalendarAccessError, CalendarStore};
