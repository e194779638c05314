use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::{CalendarAccessError, CalendarStore, NewEvent};
use crate::parser::ParsedAction;

/// Reasons a whole response is rejected.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Permission to access calendar is required.")]
    PermissionRequired,

    #[error("Invalid date range for event: {title}")]
    InvalidDate { title: String },
}

/// One action that could not be applied. The rest of the batch still runs.
#[derive(Debug, Error)]
pub enum ApplyFailure {
    #[error("Failed to add event: {title}")]
    Add {
        title: String,
        #[source]
        source: CalendarAccessError,
    },

    #[error("Failed to delete event: {id}")]
    Delete {
        id: String,
        #[source]
        source: CalendarAccessError,
    },

    #[error("Failed to delete event: no id given")]
    MissingId,
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    pub added: Vec<String>,
    pub deleted: Vec<String>,
    pub skipped: usize,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    /// Message for the user when something went wrong, `None` otherwise.
    pub fn failure_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        Some(
            self.failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

enum Step {
    Add(NewEvent),
    Delete(String),
}

/// Apply the service's actions in order.
///
/// Every `add` is validated before anything is touched. After that, calendar
/// failures are collected per item and nothing is rolled back.
pub fn apply_actions(
    store: &mut dyn CalendarStore,
    actions: &[ParsedAction],
) -> Result<ApplyReport, ApplyError> {
    let mut report = ApplyReport::default();
    let steps = plan(actions, &mut report)?;

    for step in steps {
        match step {
            Step::Delete(id) if id.trim().is_empty() => {
                warn!("delete action carried no id");
                report.failures.push(ApplyFailure::MissingId);
            }
            Step::Delete(id) => match store.delete_event(&id) {
                Ok(()) => {
                    info!(%id, "event deleted");
                    report.deleted.push(id);
                }
                Err(source) => {
                    warn!(%id, error = %source, "failed to delete event");
                    report.failures.push(ApplyFailure::Delete { id, source });
                }
            },
            Step::Add(event) => match create(store, &event) {
                Ok(id) => {
                    info!(%id, title = %event.title, "event added");
                    report.added.push(id);
                }
                Err(source) => {
                    warn!(title = %event.title, error = %source, "failed to add event");
                    report.failures.push(ApplyFailure::Add {
                        title: event.title,
                        source,
                    });
                }
            },
        }
    }

    Ok(report)
}

fn plan(actions: &[ParsedAction], report: &mut ApplyReport) -> Result<Vec<Step>, ApplyError> {
    let mut steps = Vec::with_capacity(actions.len());

    for action in actions {
        match action {
            ParsedAction::Delete { id } => steps.push(Step::Delete(id.clone())),
            ParsedAction::Add(add) => {
                let (Some(start), Some(end)) = (add.start(), add.end()) else {
                    warn!(
                        title = %add.title,
                        start = %add.start_time,
                        end = %add.end_time,
                        "rejecting response with an unparsable date"
                    );
                    return Err(ApplyError::InvalidDate {
                        title: add.title.clone(),
                    });
                };
                steps.push(Step::Add(NewEvent {
                    title: add.title.clone(),
                    start,
                    end,
                    location: add.location.clone(),
                    notes: add.summary.clone(),
                }));
            }
            ParsedAction::Unknown => {
                warn!("skipping action of unknown kind");
                report.skipped += 1;
            }
        }
    }

    Ok(steps)
}

fn create(store: &mut dyn CalendarStore, event: &NewEvent) -> Result<String, CalendarAccessError> {
    let calendar = store.default_calendar()?;
    store.create_event(&calendar.id, event)
}
