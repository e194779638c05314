use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::applier::{self, ApplyError};
use crate::calendar::{self, CalendarEvent, CalendarStore};
use crate::config::{CommandType, Config};
use crate::insights::{self, EventStats};
use crate::parser::{ParseRequest, ParsedAction, ParserClient, ParserError};

pub const SUCCESS_MESSAGE: &str = "Actions completed successfully!";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch events from calendar";
pub const ACCESS_DENIED_MESSAGE: &str = "Calendar access denied.";

const NOTICE_TTL: Duration = Duration::from_secs(3);

pub type ParseOutcome = Result<Vec<ParsedAction>, ParserError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Compose,
    Search,
}

/// A message that goes away on its own.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    shown_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= NOTICE_TTL
    }
}

pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub input: String,
    pub search_query: String,
    pub command_type: CommandType,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<Notice>,
    pub events: Vec<CalendarEvent>,
    pub stats: EventStats,
    pub access_granted: bool,
    pub show_help: bool,
    horizon: chrono::Duration,
    lookback: chrono::Duration,
    store: Box<dyn CalendarStore>,
    client: ParserClient,
    outcome_tx: UnboundedSender<ParseOutcome>,
    outcome_rx: UnboundedReceiver<ParseOutcome>,
}

impl App {
    pub fn new(config: &Config, store: Box<dyn CalendarStore>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            running: true,
            input_mode: InputMode::Compose,
            input: String::new(),
            search_query: String::new(),
            command_type: config.command_type,
            loading: false,
            error: None,
            success: None,
            events: Vec::new(),
            stats: EventStats::default(),
            access_granted: false,
            show_help: false,
            horizon: config.horizon(),
            lookback: config.lookback(),
            store,
            client: ParserClient::new(&config.endpoint),
            outcome_tx,
            outcome_rx,
        };

        app.access_granted = match app.store.request_access() {
            Ok(granted) => granted,
            Err(err) => {
                warn!(error = %err, "calendar access request failed");
                false
            }
        };

        if app.access_granted {
            app.refresh_events();
        } else {
            app.error = Some(ACCESS_DENIED_MESSAGE.to_string());
        }

        app
    }

    /// Reload the event window from the calendar and recompute the stats.
    pub fn refresh_events(&mut self) {
        if !self.access_granted {
            return;
        }

        let now = Local::now();
        match calendar::list_events(self.store.as_ref(), now - self.lookback, now + self.horizon) {
            Ok(listing) => {
                if !listing.is_complete() {
                    self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                }
                self.events = listing.events;
            }
            Err(err) => {
                warn!(error = %err, "failed to list calendars");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.events.clear();
            }
        }
        self.stats = EventStats::from_events(&self.events, now);
    }

    pub fn upcoming(&self) -> impl Iterator<Item = &CalendarEvent> {
        let now = Local::now();
        self.events.iter().filter(move |e| e.is_future(now))
    }

    pub fn search_results(&self) -> Vec<&CalendarEvent> {
        insights::search_upcoming(&self.events, &self.search_query, Local::now())
    }

    /// Send the input to the parser. Does nothing while a request is pending.
    pub fn submit(&mut self) {
        if self.loading {
            return;
        }
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        self.error = None;
        self.success = None;
        self.refresh_events();

        let request = ParseRequest::new(&input, self.command_type, self.upcoming());
        self.loading = true;

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = client.parse(&request).await;
            let _ = tx.send(outcome);
        });
    }

    /// Pick up a finished parse request, if any. Returns whether one was handled.
    pub fn poll_outcome(&mut self) -> bool {
        match self.outcome_rx.try_recv() {
            Ok(outcome) => {
                self.finish_parse(outcome);
                true
            }
            Err(_) => false,
        }
    }

    pub fn finish_parse(&mut self, outcome: ParseOutcome) {
        self.loading = false;

        let actions = match outcome {
            Ok(actions) => actions,
            Err(err) => {
                warn!(error = ?err, "parse failed");
                self.error = Some(err.to_string());
                return;
            }
        };

        if !self.access_granted {
            self.error = Some(ApplyError::PermissionRequired.to_string());
            return;
        }

        let result = applier::apply_actions(self.store.as_mut(), &actions);

        // The refresh may report its own fetch error; the apply result wins.
        self.refresh_events();

        match result {
            Ok(report) => {
                info!(
                    added = report.added.len(),
                    deleted = report.deleted.len(),
                    skipped = report.skipped,
                    failed = report.failures.len(),
                    "actions applied"
                );
                match report.failure_message() {
                    Some(message) => self.error = Some(message),
                    None => self.success = Some(Notice::new(SUCCESS_MESSAGE)),
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.error = None;
        self.success = None;
    }

    pub fn cycle_command_type(&mut self) {
        self.command_type = self.command_type.next();
    }

    pub fn toggle_search(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::Compose => InputMode::Search,
            InputMode::Search => InputMode::Compose,
        };
    }

    pub fn input_char(&mut self, c: char) {
        match self.input_mode {
            InputMode::Compose => self.input.push(c),
            InputMode::Search => self.search_query.push(c),
        }
    }

    pub fn input_str(&mut self, s: &str) {
        match self.input_mode {
            InputMode::Compose => self.input.push_str(s),
            InputMode::Search => self.search_query.push_str(s.trim_end_matches(['\r', '\n'])),
        }
    }

    pub fn backspace(&mut self) {
        match self.input_mode {
            InputMode::Compose => {
                self.input.pop();
            }
            InputMode::Search => {
                self.search_query.pop();
            }
        }
    }

    /// Drop notices whose time is up.
    pub fn tick(&mut self) {
        if self.success.as_ref().is_some_and(Notice::is_expired) {
            self.success = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration as ChronoDuration};
    use serde_json::json;

    use super::*;
    use crate::calendar::{CalendarAccessError, CalendarInfo, LocalStore, NewEvent};

    fn config(endpoint: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            ..Config::default()
        }
    }

    fn stamp(dt: DateTime<Local>) -> String {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    fn store_with_lunch() -> (LocalStore, String) {
        let mut store = LocalStore::in_memory();
        let start = Local::now() + ChronoDuration::days(1);
        let id = store
            .create_event(
                "personal",
                &NewEvent {
                    title: "Lunch".to_string(),
                    start,
                    end: start + ChronoDuration::hours(1),
                    location: None,
                    notes: None,
                },
            )
            .unwrap();
        (store, id)
    }

    fn titles(app: &App) -> Vec<&str> {
        app.events.iter().map(|e| e.title.as_str()).collect()
    }

    async fn settle(app: &mut App) {
        for _ in 0..500 {
            if app.poll_outcome() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("parse request never finished");
    }

    /// A local store that can refuse access or fail one calendar's reads.
    struct TestStore {
        inner: LocalStore,
        granted: bool,
        broken: Option<String>,
    }

    impl TestStore {
        fn denied(inner: LocalStore) -> Self {
            Self {
                inner,
                granted: false,
                broken: None,
            }
        }

        fn with_broken_calendar(mut inner: LocalStore, title: &str) -> Self {
            let broken = inner.add_calendar(title);
            Self {
                inner,
                granted: true,
                broken: Some(broken),
            }
        }
    }

    impl CalendarStore for TestStore {
        fn request_access(&mut self) -> Result<bool, CalendarAccessError> {
            Ok(self.granted)
        }

        fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarAccessError> {
            self.inner.calendars()
        }

        fn default_calendar(&self) -> Result<CalendarInfo, CalendarAccessError> {
            self.inner.default_calendar()
        }

        fn events_in_calendar(
            &self,
            calendar_id: &str,
            start: DateTime<Local>,
            end: DateTime<Local>,
        ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
            if self.broken.as_deref() == Some(calendar_id) {
                return Err(CalendarAccessError::Platform("boom".to_string()));
            }
            self.inner.events_in_calendar(calendar_id, start, end)
        }

        fn create_event(
            &mut self,
            calendar_id: &str,
            event: &NewEvent,
        ) -> Result<String, CalendarAccessError> {
            self.inner.create_event(calendar_id, event)
        }

        fn delete_event(&mut self, id: &str) -> Result<(), CalendarAccessError> {
            self.inner.delete_event(id)
        }
    }

    #[tokio::test]
    async fn mixed_actions_are_applied_and_list_is_refreshed() {
        let (store, lunch) = store_with_lunch();
        let start = Local::now() + ChronoDuration::days(2);

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/parse_event")
            .with_status(200)
            .with_body(
                json!([
                    {
                        "action": "add",
                        "title": "Meeting",
                        "start_time": stamp(start),
                        "end_time": stamp(start + ChronoDuration::hours(1))
                    },
                    { "action": "delete", "id": lunch }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let mut app = App::new(&config(&server.url()), Box::new(store));
        assert_eq!(titles(&app), vec!["Lunch"]);

        app.input = "add meeting, delete my lunch".to_string();
        app.submit();
        assert!(app.loading);
        settle(&mut app).await;

        mock.assert_async().await;
        assert!(!app.loading);
        assert_eq!(app.error, None);
        assert_eq!(
            app.success.as_ref().map(|n| n.message.as_str()),
            Some(SUCCESS_MESSAGE)
        );
        assert_eq!(titles(&app), vec!["Meeting"]);
        assert_eq!(app.stats.upcoming, 1);
    }

    #[tokio::test]
    async fn server_error_is_shown_without_touching_the_calendar() {
        let (store, _) = store_with_lunch();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/parse_event")
            .with_status(422)
            .with_body(json!({ "error": "X" }).to_string())
            .create_async()
            .await;

        let mut app = App::new(&config(&server.url()), Box::new(store));
        app.input = "gibberish".to_string();
        app.submit();
        settle(&mut app).await;

        assert_eq!(app.error.as_deref(), Some("X"));
        assert!(app.success.is_none());
        assert_eq!(titles(&app), vec!["Lunch"]);
    }

    #[tokio::test]
    async fn network_failure_clears_loading() {
        let mut app = App::new(&config("http://127.0.0.1:9"), Box::new(LocalStore::in_memory()));
        app.input = "add lunch tomorrow".to_string();
        app.submit();
        settle(&mut app).await;

        assert!(!app.loading);
        assert_eq!(app.error.as_deref(), Some("Failed to connect to the server."));
    }

    #[test]
    fn invalid_date_names_the_event_and_changes_nothing() {
        let (store, lunch) = store_with_lunch();
        let mut app = App::new(&config("http://unused"), Box::new(store));

        app.finish_parse(Ok(vec![
            ParsedAction::Delete { id: lunch },
            ParsedAction::Add(crate::parser::action::AddAction {
                title: "Standup".to_string(),
                start_time: "tomorrow-ish".to_string(),
                end_time: "later".to_string(),
                location: None,
                summary: None,
            }),
        ]));

        assert_eq!(
            app.error.as_deref(),
            Some("Invalid date range for event: Standup")
        );
        assert_eq!(titles(&app), vec!["Lunch"]);
    }

    #[tokio::test]
    async fn null_start_time_names_the_event() {
        let (store, _) = store_with_lunch();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/parse_event")
            .with_status(200)
            .with_body(
                json!([{ "action": "add", "title": "Lunch", "start_time": null, "end_time": null }])
                    .to_string(),
            )
            .create_async()
            .await;

        let mut app = App::new(&config(&server.url()), Box::new(store));
        app.input = "lunch with Sam".to_string();
        app.submit();
        settle(&mut app).await;

        assert_eq!(app.error.as_deref(), Some("Invalid date range for event: Lunch"));
        assert_eq!(titles(&app), vec!["Lunch"]);
    }

    #[test]
    fn broken_calendar_reports_fetch_failure_and_keeps_the_rest() {
        let (inner, _) = store_with_lunch();
        let app = App::new(
            &config("http://unused"),
            Box::new(TestStore::with_broken_calendar(inner, "Work")),
        );

        assert!(app.access_granted);
        assert_eq!(app.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(titles(&app), vec!["Lunch"]);
    }

    #[test]
    fn item_failure_survives_a_failing_refresh() {
        let (inner, _) = store_with_lunch();
        let mut app = App::new(
            &config("http://unused"),
            Box::new(TestStore::with_broken_calendar(inner, "Work")),
        );

        app.finish_parse(Ok(vec![ParsedAction::Delete {
            id: "no-such-event".to_string(),
        }]));

        assert_eq!(
            app.error.as_deref(),
            Some("Failed to delete event: no-such-event")
        );
    }

    #[test]
    fn huge_window_settings_do_not_panic() {
        let config = Config {
            horizon_days: i64::MAX,
            lookback_days: 1_000_000_000,
            ..config("http://unused")
        };
        let (store, _) = store_with_lunch();
        let app = App::new(&config, Box::new(store));

        assert_eq!(app.error, None);
        assert_eq!(titles(&app), vec!["Lunch"]);
    }

    #[test]
    fn success_notice_expires_on_tick() {
        let mut app = App::new(&config("http://unused"), Box::new(LocalStore::in_memory()));

        app.success = Some(Notice::new(SUCCESS_MESSAGE));
        app.tick();
        assert!(app.success.is_some());

        app.success = Some(Notice {
            message: SUCCESS_MESSAGE.to_string(),
            shown_at: Instant::now() - (NOTICE_TTL + Duration::from_secs(1)),
        });
        app.tick();
        assert!(app.success.is_none());
    }

    #[tokio::test]
    async fn pending_request_blocks_resubmission() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/parse_event")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let mut app = App::new(&config(&server.url()), Box::new(LocalStore::in_memory()));
        app.input = "add lunch".to_string();
        app.submit();
        app.submit();
        settle(&mut app).await;

        mock.assert_async().await;
        assert!(app.success.is_some());
    }

    #[test]
    fn blank_input_is_not_submitted() {
        let mut app = App::new(&config("http://unused"), Box::new(LocalStore::in_memory()));
        app.input = "   ".to_string();
        app.submit();
        assert!(!app.loading);
    }

    #[test]
    fn denied_access_blocks_calendar_changes() {
        let (inner, lunch) = store_with_lunch();
        let mut app = App::new(&config("http://unused"), Box::new(TestStore::denied(inner)));
        assert!(!app.access_granted);
        assert_eq!(app.error.as_deref(), Some(ACCESS_DENIED_MESSAGE));

        app.finish_parse(Ok(vec![ParsedAction::Delete { id: lunch.clone() }]));

        assert_eq!(
            app.error.as_deref(),
            Some("Permission to access calendar is required.")
        );
        let remaining = app
            .store
            .events_in_calendar(
                "personal",
                Local::now(),
                Local::now() + ChronoDuration::days(3),
            )
            .unwrap();
        assert_eq!(remaining[0].id, lunch);
    }

    #[test]
    fn clear_input_resets_messages() {
        let mut app = App::new(&config("http://unused"), Box::new(LocalStore::in_memory()));
        app.input = "delete lunch".to_string();
        app.error = Some("boom".to_string());
        app.success = Some(Notice::new(SUCCESS_MESSAGE));

        app.clear_input();

        assert!(app.input.is_empty());
        assert!(app.error.is_none());
        assert!(app.success.is_none());
    }

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut app = App::new(&config("http://unused"), Box::new(LocalStore::in_memory()));
        app.input_char('a');
        app.toggle_search();
        app.input_str("lun\n");
        app.backspace();

        assert_eq!(app.input, "a");
        assert_eq!(app.search_query, "lu");
    }
}
