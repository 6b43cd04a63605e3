//! pdrive TUI - interactive terminal front-end
//!
//! A ratatui rendition of the classic desktop client: a sign-in card, an
//! actions panel once linked, a colored activity log, and a connection
//! indicator refreshed on a timer. All real work happens in the rclone
//! subprocess behind the scenes.
//!
//! # Logging
//!
//! Library log events are routed into the activity log. To also get them
//! on stderr for debugging, set RUST_LOG and redirect:
//!
//! ```bash
//! RUST_LOG=debug pdrive-tui 2>> /tmp/pdrive-tui.log
//! ```

mod app;
mod tui_log;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use pdrive_core::config::Config;
use tui_log::TuiLogLayer;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let config = Config::load_or_default(&Config::default_path());
    let app = App::new(config);

    // Route library logs into the activity log panel
    init_logging(app.event_tx.clone());

    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Install the log-panel layer, plus stderr output when RUST_LOG is set
fn init_logging(log_tx: tokio::sync::mpsc::UnboundedSender<app::AppEvent>) {
    let tui_layer = TuiLogLayer::new(log_tx);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pdrive_rclone=info"));

    if std::env::var("RUST_LOG").is_ok() {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .with(stderr_layer)
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .try_init();
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    // One-shot startup work: tool probe and saved-login prefill
    app.spawn_capability_check();
    app.spawn_saved_login_recall();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        // Poll so the loop keeps ticking while nothing is typed
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.drain_events();
        app.poll_status_if_due();

        if app.should_quit {
            return Ok(());
        }
    }
}
