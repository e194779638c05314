use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Terminal input the app reacts to.
#[derive(Debug)]
pub enum Input {
    Key(KeyEvent),
    Paste(String),
}

/// Wait up to `timeout` for input. Key releases and other events are skipped.
pub fn next_input(timeout: Duration) -> color_eyre::Result<Option<Input>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(Input::Key(key))),
        Event::Paste(text) => Ok(Some(Input::Paste(text))),
        _ => Ok(None),
    }
}
