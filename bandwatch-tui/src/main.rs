//! Bandwatch TUI entry point.

use bandwatch_tui::config::TuiConfig;
use bandwatch_tui::error::TuiError;
use bandwatch_tui::events::TuiEvent;
use bandwatch_tui::notifications::NotificationLevel;
use bandwatch_tui::state::App;
use bandwatch_tui::views::render_view;
use bandwatch_tui::{logging, persistence, source};
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config.log_path)?;
    tracing::info!(source = ?config.source.kind, "starting bandwatch");

    let mut app = App::new(config)?;
    match persistence::load(&app.config.state_path) {
        Ok(Some(state)) => app.restore(&state),
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "failed to load saved state");
            app.notify(
                NotificationLevel::Warning,
                format!("Saved state unreadable: {}", err),
            );
        }
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());
    source::spawn_feed(&app.config.source, event_tx.clone());

    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        let now = Instant::now();
        if app.frame_due(now) {
            terminal.draw(|f| render_view(f, &app, now))?;
        }

        tokio::select! {
            _ = ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                if app.handle_event(event) {
                    break;
                }
            }
        }
    }

    let saved = persistence::save(&app.config.state_path, &app.persisted());
    if let Err(err) = &saved {
        tracing::error!(error = %err, "failed to save state");
    }
    tracing::info!(samples = app.samples_received, "bandwatch stopped");

    saved?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}
