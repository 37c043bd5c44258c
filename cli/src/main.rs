//! Lector CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`lector_engine`] (application state) and [`lector_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed
//! cleanup.
//!
//! ```text
//! main() -> TerminalSession::new() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! The loop wakes on either the display tick (500 ms by default) or queued
//! input:
//!
//! 1. Wait for the tick or the next input message
//! 2. Drain the input queue (bounded per wakeup)
//! 3. Render the frame (publishes viewport geometry to the app)
//! 4. Deliver the frame's intersection batch (`app.observe()`)

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::{Backend, CrosstermBackend, Terminal};
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lector_engine::{App, LectorConfig};
use lector_tui::{InputPump, MAX_EVENTS_PER_FRAME, apply_input, draw};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_lector_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_lector_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let candidates = lector_log_file_candidates();
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn lector_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.lector/logs/lector.log
    if let Some(config_path) = LectorConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("lector.log"));
    }

    // Fallback: ./.lector/logs/lector.log (useful in constrained environments)
    candidates.push(PathBuf::from(".lector").join("logs").join("lector.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Manages raw mode, the alternate screen, and alternate scroll mode. On
/// drop, all terminal state is restored to its original configuration, so
/// the terminal remains usable even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        // Enter alternate screen and enable alternate scroll mode (mode 1007).
        // Mode 1007 converts scroll wheel events to Up/Down arrow keys when in
        // alternate screen, WITHOUT capturing mouse clicks. This preserves
        // native text selection while still allowing scroll wheel to work.
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        // Enable alternate scroll mode: CSI ? 1007 h
        let _ = out.write_all(b"\x1b[?1007h");
        let _ = out.flush();

        let backend = CrosstermBackend::new(out);
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let mut out = stdout();
                // Disable alternate scroll mode: CSI ? 1007 l
                let _ = out.write_all(b"\x1b[?1007l");
                let _ = out.flush();
                let _ = execute!(out, LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        // Disable alternate scroll mode: CSI ? 1007 l
        let _ = self.terminal.backend_mut().write_all(b"\x1b[?1007l");
        let _ = std::io::Write::flush(&mut *self.terminal.backend_mut());
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = LectorConfig::load().ok().flatten();
    let mut app = App::new(config);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    // Teardown: detach all observed elements and flush open intervals.
    app.shutdown(Instant::now());

    result
}

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut ticker = tokio::time::interval(app.tick_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        tokio::select! {
            _ = ticker.tick() => {
                app.tick();
            }
            msg = input.recv() => {
                match msg {
                    Some(msg) => {
                        if let Err(e) = drain_input(app, &mut input, &msg) {
                            break Err(e);
                        }
                    }
                    None => app.request_quit(),
                }
            }
        }

        if app.should_quit() {
            break Ok(());
        }

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }

        // Deliver this frame's intersection batch: timer transitions and
        // load-more crossings are applied here, never during rendering.
        app.observe(Instant::now());
    };

    input.shutdown().await;
    result
}

/// Apply the first message plus anything already queued, bounded so a key
/// repeat burst never starves rendering.
fn drain_input(app: &mut App, input: &mut InputPump, first: &lector_tui::InputMsg) -> Result<()> {
    apply_input(app, first)?;
    for _ in 1..MAX_EVENTS_PER_FRAME {
        let Some(msg) = input.try_recv() else {
            break;
        };
        apply_input(app, &msg)?;
    }
    Ok(())
}
