//! Terminal User Interface module using ratatui

mod app;
mod components;
mod events;
mod keys;
mod pages;
mod styles;
mod utils;

use app::App;
use events::EventHandler;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::api::HealthApi;
use crate::config::Config;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort restore used from the panic hook
pub fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Main TUI entry point
pub async fn run(config: Config, api: Arc<dyn HealthApi>) -> Result<()> {
    let mut terminal = init_terminal(config.mouse_enabled)?;
    let mut event_handler = EventHandler::new(TICK_RATE);
    let mut app = App::new(config, api, event_handler.sender());

    let result = match app.start().await {
        Ok(()) => run_app(&mut terminal, &mut app, &mut event_handler).await,
        Err(e) => Err(e),
    };

    restore_terminal(&mut terminal)?;
    if let Err(e) = &result {
        error!("TUI stopped with an error: {}", e);
    } else {
        info!("TUI closed");
    }
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next().await {
            Some(event) => {
                if app.handle_event(event).await? {
                    break; // Exit requested
                }
            }
            None => break,
        }
    }
    Ok(())
}
