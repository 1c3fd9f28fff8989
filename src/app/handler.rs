//! Maps key and mouse events to state mutations.
//!
//! A "tap" on the inline video is a left click inside its on-screen
//! rectangle or the expand binding; a tap on the fullscreen presentation is
//! a left click anywhere or the dismiss binding.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::ui::layout::cell_to_point;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;
    let step = state.config.scroll_step;
    match action {
        Action::ScrollUp => state.scroll_by(-step),
        Action::ScrollDown => state.scroll_by(step),
        Action::PageUp => state.scroll_by(-state.page_height()),
        Action::PageDown => state.scroll_by(state.page_height()),
        Action::Expand => state.expand(),
        Action::Dismiss => state.dismiss(),
        Action::Quit => state.should_quit = true,
    }
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let step = state.config.scroll_step;
    match mouse.kind {
        MouseEventKind::ScrollUp => state.scroll_by(-step),
        MouseEventKind::ScrollDown => state.scroll_by(step),
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(point) = cell_to_point(state.stage_area, mouse.column, mouse.row) else {
                return;
            };
            if state.fullscreen_visible() {
                if state.stage.fullscreen.as_ref().is_some_and(|f| f.contains(point)) {
                    state.dismiss();
                }
            } else if state.stage.inline.contains(point) {
                state.expand();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::transition::TransitionState;

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        AppState::new(AppConfig::default(), Rect::new(0, 0, 80, 24), tx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn settle(state: &mut AppState) {
        for _ in 0..120 {
            state.tick(Duration::from_micros(16_667));
        }
    }

    #[test]
    fn click_on_video_expands_and_click_again_dismisses() {
        let mut s = state();
        // Row 0 is the title line; the stage starts on row 1.
        handle_mouse(&mut s, click(10, 2));
        assert_eq!(s.transition_state(), TransitionState::Presenting);
        settle(&mut s);
        assert_eq!(s.transition_state(), TransitionState::Presented);

        handle_mouse(&mut s, click(70, 20));
        assert_eq!(s.transition_state(), TransitionState::Dismissing);
    }

    #[test]
    fn clicks_off_the_video_do_nothing() {
        let mut s = state();
        // Title and status lines.
        handle_mouse(&mut s, click(10, 0));
        handle_mouse(&mut s, click(10, 23));
        assert_eq!(s.transition_state(), TransitionState::Idle);

        // Shrink the video into the corner, then click the grid beside it.
        s.scroll_by(s.stage.inline.full_height());
        settle(&mut s);
        handle_mouse(&mut s, click(60, 15));
        assert_eq!(s.transition_state(), TransitionState::Idle);
        handle_mouse(&mut s, click(10, 3));
        assert_eq!(s.transition_state(), TransitionState::Presenting);
    }

    #[test]
    fn keys_drive_scroll_and_transitions() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.scroll.target(), s.config.scroll_step);

        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.transition_state(), TransitionState::Presenting);
        // A second expand while presenting is rejected.
        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.transition_state(), TransitionState::Presenting);

        handle_key(&mut s, press(KeyCode::Char('q')));
        assert!(s.should_quit);
    }

    #[test]
    fn wheel_scrolls() {
        let mut s = state();
        let mut wheel = click(10, 10);
        wheel.kind = MouseEventKind::ScrollDown;
        handle_mouse(&mut s, wheel);
        handle_mouse(&mut s, wheel);
        assert_eq!(s.scroll.target(), 2.0 * s.config.scroll_step);
    }
}
