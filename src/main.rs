//! A terminal video player with a scroll-shrinking inline player and a
//! spring-animated, rotated fullscreen view.
//!
//! Run the binary to launch the player.  Run with `--write-config` to write
//! the effective configuration to disk and exit.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::transition::TransitionReport;
use crate::ui::{layout::AppLayout, theme::Theme, video::StageView, video::TestCard};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal video player with a parallax inline view")]
struct Cli {
    /// Scale of the inline player once fully scrolled (0.1 - 1.0).
    #[arg(long)]
    min_scale: Option<f64>,

    /// Stream to open instead of the configured one.
    #[arg(long)]
    media_url: Option<String>,

    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Save the effective configuration and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(min_scale) = self.min_scale {
            config.min_scale = min_scale.clamp(0.1, 1.0);
        }
        if let Some(url) = &self.media_url {
            config.media_url = url.clone();
        }
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());

    let title = Line::from(vec![
        Span::styled(" reelview ", Theme::title_style()),
        Span::raw(state.stage.surface.playback().media_url()),
        Span::styled(format!("  [{:?}]", state.transition_state()), Theme::state_style()),
    ]);
    frame.render_widget(Paragraph::new(title), layout.title_area);

    let picture = TestCard::frame(state.playback_clock);
    frame.render_widget(
        StageView::new(&state.stage, &state.grid, state.content_top(), &picture),
        layout.stage_area,
    );

    let status = match &state.status_message {
        Some(message) => Paragraph::new(message.as_str()).style(Theme::status_message_style()),
        None => Paragraph::new(state.config.status_bar_hint(state.fullscreen_visible()))
            .style(Theme::status_bar_style()),
    };
    frame.render_widget(status, layout.status_area);
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut config = AppConfig::load();
    cli.apply(&mut config);

    if cli.write_config {
        let path = config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(terminal: &mut Terminal<CrosstermBackend<Stderr>>, config: AppConfig) -> Result<()> {
    let size = terminal.size()?;
    let (reports_tx, mut reports_rx) = mpsc::unbounded_channel::<TransitionReport>();
    let mut state = AppState::new(config, Rect::new(0, 0, size.width, size.height), reports_tx);
    tracing::info!(url = state.stage.surface.playback().media_url(), "playback opened");

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(50));
    let mut frames = tokio::time::interval(state.config.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => state.relayout(Rect::new(0, 0, w, h)),
                    AppEvent::FocusLost => state.interrupt(),
                    AppEvent::FocusGained => {}
                }
            }

            Some(report) = reports_rx.recv() => state.on_report(report),

            now = frames.tick() => {
                state.tick(now - last_frame);
                last_frame = now;
            }
        }

        if state.should_quit {
            // Quitting mid-flight is an interruption like any other.
            state.interrupt();
            while let Ok(report) = reports_rx.try_recv() {
                state.on_report(report);
            }
            break;
        }
    }

    Ok(())
}
