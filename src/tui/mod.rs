//! TUI interface using ratatui
//!
//! Interactive search over a loaded session: the result list re-ranks on
//! every keystroke, with a preview of the selected section.

mod app;
mod ui;
mod widgets;

pub use app::{App, AppState, View};

use crate::config::AppConfig;
use crate::session::SearchSession;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Run the TUI application
///
/// Must be called from a multi-threaded tokio runtime; refresh blocks on the
/// session from inside the event loop.
pub fn run(session: SearchSession, config: &AppConfig, query: &str) -> Result<()> {
    let mut app = App::new(session, config, query);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main application loop
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Global keybindings
                match (key.modifiers, key.code) {
                    (KeyModifiers::CONTROL, KeyCode::Char('c'))
                    | (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
                        return Ok(());
                    }
                    _ => {}
                }

                if app.handle_key(key)? {
                    return Ok(());
                }
            }
        }
    }
}
