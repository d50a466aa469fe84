//! TUI event handling
//!
//! Blocking poll with a tick timeout; the loop is single-threaded.

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use eyre::Result;
use tracing::trace;

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick (no input within the tick rate)
    Tick,
}

/// Event source for the TUI
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        trace!(?tick_rate, "EventHandler::new: called");
        Self { tick_rate }
    }

    /// Wait up to one tick for the next event
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        let event = match event::read()? {
            // Release/repeat events would double every keystroke on some terminals
            event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                trace!(?key, "EventHandler: key event received");
                Event::Key(key)
            }
            event::Event::Resize(w, h) => Event::Resize(w, h),
            _ => Event::Tick,
        };
        Ok(event)
    }
}
