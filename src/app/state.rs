//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! The engine participants sit inside [`Stage`]; this type wires them to the
//! terminal: layout passes, the scroll source, the frame clock and the
//! transition completions.

use std::time::Duration;

use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::AppConfig;
use crate::core::geometry::Point;
use crate::core::stage::Stage;
use crate::core::surface::{HostId, PlaybackHandle};
use crate::core::transition::{
    SharedElementAnimator, TransitionCoordinator, TransitionKind, TransitionReport, TransitionState,
};
use crate::ui::grid::GridLayout;
use crate::ui::layout::{stage_size, AppLayout};
use crate::ui::smooth_scroll::SmoothScroll;

/// Fraction of the gap the scroller closes per tick.
const SCROLL_EASE: f64 = 0.35;

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// Surface, hosts and transition layer.
    pub stage: Stage,
    pub coordinator: TransitionCoordinator,
    pub grid: GridLayout,
    pub scroll: SmoothScroll,
    /// Where the stage sits in the terminal, for mouse hit-testing.
    pub stage_area: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Playback position of the test card.
    pub playback_clock: Duration,
    /// Completions post their reports here; the event loop drains them.
    reports: UnboundedSender<TransitionReport>,
}

impl AppState {
    pub fn new(config: AppConfig, terminal_area: Rect, reports: UnboundedSender<TransitionReport>) -> Self {
        let layout = AppLayout::from_area(terminal_area);
        let screen = stage_size(layout.stage_area);
        let stage = Stage::new(
            screen,
            Point::default(),
            config.parallax_style(),
            PlaybackHandle::open(config.media_url.clone()),
        );
        let coordinator = TransitionCoordinator::new(SharedElementAnimator::new(config.spring_timing()));

        let mut state = Self {
            config,
            stage,
            coordinator,
            grid: GridLayout::default(),
            scroll: SmoothScroll::new(SCROLL_EASE),
            stage_area: layout.stage_area,
            should_quit: false,
            status_message: None,
            playback_clock: Duration::ZERO,
            reports,
        };
        state.relayout(terminal_area);
        state
    }

    /// Terminal resized (or first layout): run the layout pass on every host
    /// and rebuild the grid when the width changed.
    pub fn relayout(&mut self, terminal_area: Rect) {
        let layout = AppLayout::from_area(terminal_area);
        self.stage_area = layout.stage_area;
        let screen = stage_size(layout.stage_area);
        let inset = self.stage.resize(screen);
        if self.grid.width() != screen.width {
            self.grid = GridLayout::new(screen.width);
        }
        self.scroll.set_max(self.grid.max_scroll(inset, screen.height));
        self.sync_scroll();
    }

    /// One frame-clock tick.
    pub fn tick(&mut self, dt: Duration) {
        self.playback_clock += dt;
        // The completion carries the report to the event loop.
        let _ = self.coordinator.tick(&mut self.stage, dt);
        if self.scroll.tick() {
            self.sync_scroll();
        }
    }

    /// Feed the displayed scroll position to the inline container.
    fn sync_scroll(&mut self) {
        let (offset, inset) = self.scroll.scroll_sample(self.stage.inline.full_height());
        self.stage.inline.on_scroll(offset, inset);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll.scroll_by(delta);
    }

    /// Stage y of the grid's top edge.
    pub fn content_top(&self) -> f64 {
        self.stage.inline.full_height() - self.scroll.current()
    }

    pub fn page_height(&self) -> f64 {
        self.stage.screen().height * 0.8
    }

    // ── transitions ─────────────────────────────────────────────

    /// Tap on the inline container.  Creates the fullscreen presentation and
    /// asks the coordinator to present into it.
    pub fn expand(&mut self) {
        let created = self.stage.fullscreen.is_none();
        self.stage.prepare_fullscreen();
        let request = self.stage.inline.expand_request(&self.stage.surface);
        let completion = self.completion();
        if let Err(err) = self.coordinator.request_expand(&mut self.stage, request, completion) {
            tracing::debug!(%err, "expand not started");
            if created && self.stage.owner() == HostId::Inline {
                self.stage.fullscreen = None;
            }
        }
    }

    /// Tap on the fullscreen presentation.
    pub fn dismiss(&mut self) {
        let Some(request) = self.stage.fullscreen.as_ref().map(|f| f.dismiss_request()) else {
            tracing::debug!("dismiss ignored: nothing presented");
            return;
        };
        let completion = self.completion();
        if let Err(err) = self.coordinator.request_dismiss(&mut self.stage, request, completion) {
            tracing::debug!(%err, "dismiss not started");
        }
    }

    /// Platform interruption (focus loss, quit).
    pub fn interrupt(&mut self) {
        if self.coordinator.is_animating() {
            let _ = self.coordinator.interrupt(&mut self.stage);
        }
    }

    /// Is the fullscreen presentation what the user is looking at?
    pub fn fullscreen_visible(&self) -> bool {
        self.stage.fullscreen.as_ref().is_some_and(|f| !f.is_hidden())
    }

    pub fn on_report(&mut self, report: TransitionReport) {
        let message = match (report.kind, report.success) {
            (_, false) => format!("{} interrupted, back to {}", report.kind, report.owner),
            (TransitionKind::Present, true) => "fullscreen".to_string(),
            (TransitionKind::Dismiss, true) => "inline".to_string(),
        };
        self.status_message = Some(message);
    }

    pub fn transition_state(&self) -> TransitionState {
        self.coordinator.state()
    }

    fn completion(&self) -> impl FnOnce(&TransitionReport) + 'static {
        let reports = self.reports.clone();
        move |report: &TransitionReport| {
            // Receiver gone means the loop is shutting down.
            let _ = reports.send(*report);
        }
    }
}
