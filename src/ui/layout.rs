//! Layout helpers: split the terminal area into regions and map between
//! terminal cells and the engine's point space.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::core::geometry::{Point, Size};

/// Points covered by one terminal column.
pub const POINTS_PER_COL: f64 = 4.0;
/// Points covered by one terminal row.
pub const POINTS_PER_ROW: f64 = 8.0;
/// Side of one half-block pixel, in points.
pub const POINTS_PER_PIXEL: f64 = 4.0;

/// Primary screen layout: title line, the stage, and a bottom status bar.
pub struct AppLayout {
    pub title_area: Rect,
    pub stage_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(3),    // stage (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            title_area: chunks[0],
            stage_area: chunks[1],
            status_area: chunks[2],
        }
    }
}

/// Size of `area` in points.  This is the engine's window.
pub fn stage_size(area: Rect) -> Size {
    Size::new(
        f64::from(area.width) * POINTS_PER_COL,
        f64::from(area.height) * POINTS_PER_ROW,
    )
}

/// Centre of terminal cell `(column, row)` in stage points, or `None` when the
/// cell lies outside `area`.
pub fn cell_to_point(area: Rect, column: u16, row: u16) -> Option<Point> {
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    Some(Point::new(
        (f64::from(column - area.x) + 0.5) * POINTS_PER_COL,
        (f64::from(row - area.y) + 0.5) * POINTS_PER_ROW,
    ))
}

/// Centre of half-block pixel `(px, py)` in stage points.
pub fn pixel_center(px: u32, py: u32) -> Point {
    Point::new(
        (f64::from(px) + 0.5) * POINTS_PER_PIXEL,
        (f64::from(py) + 0.5) * POINTS_PER_PIXEL,
    )
}

/// Pixel span `[start, end)` covering the point interval `[from, to)`.
pub fn pixel_span(from: f64, to: f64, limit: u32) -> (u32, u32) {
    let lo = (from / POINTS_PER_PIXEL).floor().max(0.0);
    let hi = (to / POINTS_PER_PIXEL).ceil().max(0.0);
    let clamp = |v: f64| (v as u32).min(limit);
    (clamp(lo), clamp(hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_takes_everything_between_title_and_status() {
        let l = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(l.title_area, Rect::new(0, 0, 80, 1));
        assert_eq!(l.stage_area, Rect::new(0, 1, 80, 22));
        assert_eq!(l.status_area, Rect::new(0, 23, 80, 1));
        assert_eq!(stage_size(l.stage_area), Size::new(320.0, 176.0));
    }

    #[test]
    fn cells_map_to_their_centres() {
        let area = Rect::new(0, 1, 80, 22);
        assert_eq!(cell_to_point(area, 0, 1), Some(Point::new(2.0, 4.0)));
        assert_eq!(cell_to_point(area, 10, 3), Some(Point::new(42.0, 20.0)));
        assert_eq!(cell_to_point(area, 0, 0), None);
        assert_eq!(cell_to_point(area, 80, 5), None);
    }

    #[test]
    fn pixel_span_is_clamped_to_the_canvas() {
        assert_eq!(pixel_span(-10.0, 10.0, 100), (0, 3));
        assert_eq!(pixel_span(8.0, 16.0, 100), (2, 4));
        assert_eq!(pixel_span(390.0, 500.0, 100), (97, 100));
    }
}
