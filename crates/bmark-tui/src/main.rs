//! Bmark palette - terminal command palette over browser bookmarks.
//!
//! Connects to the bmark daemon over its socket and runs an overlay-style
//! palette: Ctrl+K toggles it, typing searches bookmarks, Enter opens the
//! selection or falls back to a web search.

use std::io;
use std::process::{Command, Stdio};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Position};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod app;
mod channel;
mod cli;
mod colors;
mod config;
mod render;

use app::{App, FetchSpec, Row};
use channel::{Channel, FailureClass, FetchOutcome};
use cli::Cli;
use config::Config;

/// Spawn a command with all I/O redirected to null (fire and forget)
fn spawn_silent(program: &str, args: &[&str]) {
    let _ = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
}

/// Set up logging with file output. The TUI must log to file since it uses
/// the terminal for display.
fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("bmark-tui-{timestamp}.log");
    let log_path = std::path::Path::new("/tmp").join(&log_filename);

    let symlink_path = std::path::Path::new("/tmp/bmark-tui.log");
    let _ = std::fs::remove_file(symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, symlink_path);

    let file_appender = tracing_appender::rolling::never("/tmp", &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = Config::load();
    let channel = Channel::connect(cli.socket_path.as_deref()).await;
    if !channel.is_available() {
        info!("Daemon not reachable at startup; palette runs without bookmark results");
    }

    run_tui(channel, config).await
}

async fn run_tui(channel: Channel, config: Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &channel, &config).await;

    // Restore the terminal on every exit path, success or error.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    channel: &Channel,
    config: &Config,
) -> Result<()> {
    let mut app = App::new();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut event_stream = EventStream::new();
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| render::ui(f, &app))?;
            needs_render = false;
        }

        tokio::select! {
            maybe_event = event_stream.next() => {
                let Some(event) = maybe_event else { break };
                match event? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        handle_key(&mut app, channel, config, &outcome_tx, key.code, key.modifiers);
                        needs_render = true;
                    }
                    Event::Mouse(mouse) => {
                        let size = terminal.size()?;
                        let area = ratatui::layout::Rect::new(0, 0, size.width, size.height);
                        if handle_mouse(&mut app, area, &mouse) {
                            needs_render = true;
                        }
                    }
                    Event::Resize(_, _) => {
                        needs_render = true;
                    }
                    _ => {}
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                handle_outcome(&mut app, outcome);
                needs_render = true;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    channel: &Channel,
    config: &Config,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
        }
        KeyCode::Char('k') if ctrl => {
            if let Some(spec) = app.toggle() {
                dispatch(app, channel, outcome_tx, spec);
            }
        }
        // While closed, everything except the hotkeys above is swallowed so
        // keystrokes never leak past the palette.
        _ if !app.open => {}
        KeyCode::Esc => {
            app.close();
        }
        KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Down => {
            app.move_down();
        }
        KeyCode::Enter => {
            select_current(app, config);
        }
        KeyCode::Backspace => {
            if let Some(spec) = app.pop_char() {
                dispatch(app, channel, outcome_tx, spec);
            }
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(spec) = app.push_char(c) {
                dispatch(app, channel, outcome_tx, spec);
            }
        }
        _ => {}
    }
}

/// Backdrop click: a left click outside the palette rectangle closes it.
fn handle_mouse(
    app: &mut App,
    area: ratatui::layout::Rect,
    mouse: &crossterm::event::MouseEvent,
) -> bool {
    if !app.open {
        return false;
    }
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return false;
    }

    let rect = render::palette_rect(area);
    if rect.contains(Position::new(mouse.column, mouse.row)) {
        return false;
    }

    app.close();
    true
}

fn dispatch(
    app: &mut App,
    channel: &Channel,
    outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
    spec: FetchSpec,
) {
    if !channel.dispatch(spec, outcome_tx) && !app.notice_logged {
        info!("Bookmark service unavailable - start bmark-daemon and reopen the palette");
        app.notice_logged = true;
    }
}

fn handle_outcome(app: &mut App, outcome: FetchOutcome) {
    match outcome.result {
        Ok(entries) => {
            app.apply_outcome(outcome.seq, entries);
        }
        Err(e) => match channel::classify_failure(&e) {
            FailureClass::StaleConnection => {
                if !app.notice_logged {
                    info!("Stale daemon connection - restart bmark to reconnect ({e})");
                    app.notice_logged = true;
                }
            }
            FailureClass::Other => {
                warn!("Bookmark fetch failed: {e}");
            }
        },
    }
}

/// Open the selected row and close the palette.
fn select_current(app: &mut App, config: &Config) {
    let url = match app.selected_row() {
        Some(Row::Bookmark(entry)) => entry.url.clone(),
        Some(Row::WebSearch(query)) => config.search_url(query),
        None => return,
    };

    spawn_silent(&config.opener, &[&url]);
    app.close();
}
