mod app;
mod applier;
mod calendar;
mod components;
mod config;
mod event;
mod insights;
mod logging;
mod parser;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, InputMode};
use calendar::{CalendarStore, LocalStore};
use color_eyre::Result;
use config::{Backend, Config};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::Input;
use ratatui::layout::{Constraint, Layout};
use tracing::info;

const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    color_eyre::install()?;

    let log_path = logging::init()?;
    let config = Config::load();
    theme::init(&config.theme);
    info!(endpoint = %config.endpoint, backend = ?config.backend, "starting event-parser");

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    eprintln!("Connecting to calendar...");
    let store = open_store(config.backend)?;
    let mut app = App::new(&config, store);
    eprintln!("Calendar ready. Logging to {}.", log_path.display());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn open_store(backend: Backend) -> Result<Box<dyn CalendarStore>> {
    match backend {
        #[cfg(target_os = "macos")]
        Backend::System => Ok(Box::new(calendar::EventKitStore::new())),
        #[cfg(not(target_os = "macos"))]
        Backend::System => {
            info!("EventKit is not available here, using the local calendar");
            open_local()
        }
        Backend::Local => open_local(),
    }
}

fn open_local() -> Result<Box<dyn CalendarStore>> {
    let store = LocalStore::open()?;
    if let Some(path) = store.path() {
        info!(path = %path.display(), "using local calendar");
    }
    Ok(Box::new(store))
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut tick: usize = 0;

    while app.running {
        app.poll_outcome();
        app.tick();

        terminal.draw(|frame| {
            let area = frame.area();

            let layout = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

            components::StatsBar::render(frame, layout[0], &app.stats);

            let composing = app.input_mode == InputMode::Compose;
            if composing {
                components::InputBox::render(
                    frame,
                    layout[1],
                    &format!("Request [{}]", app.command_type.label()),
                    &app.input,
                    "e.g. add meeting at 2pm Monday, delete my lunch",
                    true,
                );
            } else {
                components::InputBox::render(
                    frame,
                    layout[1],
                    "Search upcoming",
                    &app.search_query,
                    "type part of an event title",
                    true,
                );
            }

            components::MessageBox::render(
                frame,
                layout[2],
                app.loading,
                app.error.as_deref(),
                app.success.as_ref().map(|n| n.message.as_str()),
                tick,
            );

            if !app.access_granted {
                components::UpcomingList::render(
                    frame,
                    layout[3],
                    "Upcoming",
                    &[],
                    "Calendar access denied. Grant access in \
                     System Settings > Privacy & Security > Calendars, then restart.",
                );
            } else if composing {
                let upcoming: Vec<_> = app.upcoming().collect();
                components::UpcomingList::render(
                    frame,
                    layout[3],
                    "Upcoming",
                    &upcoming,
                    "No upcoming events",
                );
            } else {
                let results = app.search_results();
                components::UpcomingList::render(
                    frame,
                    layout[3],
                    "Results",
                    &results,
                    "No matching upcoming events",
                );
            }

            components::StatusBar::render(frame, layout[4], app.input_mode, app.command_type);

            if app.show_help {
                components::Help::render(frame, area);
            }
        })?;

        match event::next_input(TICK)? {
            Some(Input::Key(key)) => handle_key(app, key),
            Some(Input::Paste(text)) => app.input_str(&text),
            None => {}
        }
        tick = tick.wrapping_add(1);
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help overlay takes priority
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
            app.show_help = false;
        }
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.running = false,
        (KeyCode::F(1), _) => app.show_help = true,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => app.toggle_search(),
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => app.refresh_events(),
        _ => match app.input_mode {
            InputMode::Compose => handle_compose_key(app, key),
            InputMode::Search => handle_search_key(app, key),
        },
    }
}

fn handle_compose_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.running = false,
        (KeyCode::Enter, KeyModifiers::ALT) => app.input_char('\n'),
        (KeyCode::Enter, _) => app.submit(),
        (KeyCode::Tab, _) => app.cycle_command_type(),
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => app.clear_input(),
        (KeyCode::Backspace, _) => app.backspace(),
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => app.input_char(c),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.toggle_search(),
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => app.search_query.clear(),
        (KeyCode::Backspace, _) => app.backspace(),
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => app.input_char(c),
        _ => {}
    }
}
