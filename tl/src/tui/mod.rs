//! Terminal User Interface for tasklist
//!
//! A single-screen view over the TaskList:
//! - New-task input at the top, filter tabs in the header
//! - Task rows with toggle/edit/delete on vim-style keys
//! - Notices for add/update/delete in the footer, cleared on expiry

mod app;
mod events;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use state::{AppState, InteractionMode};

use std::io::{self, Stdout};
use std::time::Instant;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::config::UiConfig;
use crate::store::TaskList;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI until the user quits
pub fn run(list: TaskList, ui: &UiConfig) -> Result<()> {
    let mut terminal = init()?;

    // Use a guard to ensure terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut app = App::new(list, ui.notice_duration());
    let events = EventHandler::new(ui.tick_rate());
    info!("TUI started");

    while !app.should_quit() {
        terminal.draw(|frame| views::render(&app, frame))?;
        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
            }
            Event::Resize(w, h) => debug!(w, h, "run: resized"),
            Event::Tick => {}
        }
        app.tick(Instant::now());
    }

    info!("TUI exiting");
    Ok(())
}
