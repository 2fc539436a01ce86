mod app;
mod config;
mod event;
pub mod themes;
mod ui;

use app::{App, TuiConfig};
use event::{Event, EventHandler};

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

const DEBUG_LOG: &str = "rnor-debug.log";

pub fn run(theme: Option<&str>, api_url: &str, local: bool, debug: bool) -> Result<()> {
    if debug {
        // The alternate screen owns stdout and stderr, so logs go to a file.
        let file = File::create(DEBUG_LOG)?;
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let events = EventHandler::new(Duration::from_millis(100));
    let config = TuiConfig {
        theme: theme.map(str::to_string),
        api_url: api_url.to_string(),
        local,
    };
    let mut app = App::new(config, events.sender())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = events;
    let result = run_loop(&mut terminal, &mut app, &mut events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        match events.next()? {
            Event::Tick => {
                app.on_tick();
            }
            Event::Key(key) => {
                if app.handle_key_event(key) {
                    break;
                }
            }
            Event::Resize(w, h) => {
                app.handle_resize(w, h);
            }
            Event::Calculated(result) => {
                app.on_calculated(result);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
