mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use std::time::Duration;

use anyhow::Result;
use chitas_core::Config;
use tracing::{error, warn};

use app::App;
use tui::EventHandler;

const TICK_RATE: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best effort; the UI still starts without it
    if let Err(err) = logging::init() {
        eprintln!("chitas: file logging disabled: {err}");
    }

    let config = Config::load().unwrap_or_else(|err| {
        warn!("could not read config, using defaults: {err}");
        Config::default()
    });

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let today = chrono::Local::now().date_naive();
    let mut app = App::new(&config, today);
    app.start_calendar_fetch();

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    if let Err(err) = &result {
        error!("exiting on error: {err:#}");
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event);
        app.poll_tasks().await;
    }

    Ok(())
}
