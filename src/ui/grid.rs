//! Scrollable two-column content grid laid out beneath the inline video.
//!
//! Items alternate between the columns (even ids left, odd right) and each
//! column stacks independently.  Every eleventh item is a wide 4:3 card; the
//! rest are tall 3:4 cards.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::canvas::Canvas;
use super::layout::{POINTS_PER_COL, POINTS_PER_ROW};
use super::theme::Theme;
use crate::core::geometry::{Frame, Point};

pub const ITEM_COUNT: usize = 110;
pub const SPACING: f64 = 8.0;
pub const PADDING: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridItem {
    pub id: usize,
    /// Frame in content space (origin at the top of the grid).
    pub frame: Frame,
}

impl GridItem {
    #[cfg(test)]
    pub fn is_wide(&self) -> bool {
        is_wide(self.id)
    }
}

fn is_wide(id: usize) -> bool {
    id % 11 == 0
}

#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    width: f64,
    items: Vec<GridItem>,
    content_height: f64,
}

impl GridLayout {
    pub fn new(width: f64) -> Self {
        let column_width = ((width - 2.0 * PADDING - SPACING) / 2.0).max(0.0);
        let mut column_y = [PADDING, PADDING];
        let items = (0..ITEM_COUNT)
            .map(|id| {
                let column = id % 2;
                let height = if is_wide(id) {
                    column_width * 3.0 / 4.0
                } else {
                    column_width * 4.0 / 3.0
                };
                let x = PADDING + column as f64 * (column_width + SPACING);
                let frame = Frame::new(x, column_y[column], column_width, height);
                column_y[column] += height + SPACING;
                GridItem { id, frame }
            })
            .collect();
        let content_height = column_y[0].max(column_y[1]) - SPACING + PADDING;
        Self {
            width,
            items,
            content_height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    #[cfg(test)]
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    #[cfg(test)]
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Largest scroll distance: the grid's bottom edge meets the viewport's.
    pub fn max_scroll(&self, inset_top: f64, viewport_height: f64) -> f64 {
        (inset_top + self.content_height - viewport_height).max(0.0)
    }

    /// Items intersecting the content-space band `[top, bottom)`.
    pub fn visible(&self, top: f64, bottom: f64) -> impl Iterator<Item = &GridItem> {
        self.items
            .iter()
            .filter(move |item| item.frame.max_y() > top && item.frame.y < bottom)
    }

    /// Paint the cards with the grid's top edge at stage y `content_top`.
    pub fn paint(&self, canvas: &mut Canvas, content_top: f64, viewport_height: f64) {
        for item in self.visible(-content_top, viewport_height - content_top) {
            let f = item.frame;
            canvas.fill_frame(
                Frame::new(f.x, f.y + content_top, f.width, f.height),
                Theme::card_colour(item.id),
            );
        }
    }

    /// Write each visible card's id into its top-left cell, skipping cells
    /// that fall inside any `occluded` frame.
    pub fn render_labels(&self, area: Rect, buf: &mut Buffer, content_top: f64, occluded: &[Frame]) {
        let viewport_height = f64::from(area.height) * POINTS_PER_ROW;
        for item in self.visible(-content_top, viewport_height - content_top) {
            let f = item.frame;
            let col = (f.x / POINTS_PER_COL).ceil();
            let row = ((f.y + content_top) / POINTS_PER_ROW).ceil();
            let label = format!(" {} ", item.id);
            // Whole label inside the card and the stage.
            let label_w = label.len() as f64 * POINTS_PER_COL;
            let top_left = Point::new(col * POINTS_PER_COL, row * POINTS_PER_ROW);
            if row < 0.0
                || top_left.y + POINTS_PER_ROW > (f.max_y() + content_top).min(viewport_height)
                || top_left.x + label_w > f.max_x()
            {
                continue;
            }
            let hidden = occluded.iter().any(|o| {
                let label_frame = Frame::new(top_left.x, top_left.y, label_w, POINTS_PER_ROW);
                intersects(o, &label_frame)
            });
            if hidden {
                continue;
            }
            buf.set_string(
                area.x + col as u16,
                area.y + row as u16,
                label,
                Theme::card_label_style(Theme::card_colour(item.id)),
            );
        }
    }
}

fn intersects(a: &Frame, b: &Frame) -> bool {
    a.x < b.max_x() && b.x < a.max_x() && a.y < b.max_y() && b.y < a.max_y()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_alternate_between_columns() {
        let g = GridLayout::new(320.0);
        let column_width = (320.0 - 24.0) / 2.0;
        assert_eq!(g.items().len(), ITEM_COUNT);
        assert_eq!(g.items()[0].frame.x, PADDING);
        assert_eq!(g.items()[1].frame.x, PADDING + column_width + SPACING);
        assert_eq!(g.items()[2].frame.x, PADDING);
        // Each column stacks on its own.
        assert_eq!(g.items()[2].frame.y, g.items()[0].frame.max_y() + SPACING);
        assert_eq!(g.items()[3].frame.y, g.items()[1].frame.max_y() + SPACING);
    }

    #[test]
    fn every_eleventh_item_is_wide() {
        let g = GridLayout::new(320.0);
        let w = g.items()[0].frame.width;
        assert!(g.items()[0].is_wide());
        assert!((g.items()[0].frame.height - w * 0.75).abs() < 1e-9);
        assert!(!g.items()[1].is_wide());
        assert!((g.items()[1].frame.height - w * 4.0 / 3.0).abs() < 1e-9);
        assert!(g.items()[22].is_wide());
        assert_eq!(g.items().iter().filter(|i| i.is_wide()).count(), 10);
    }

    #[test]
    fn content_height_covers_the_taller_column() {
        let g = GridLayout::new(320.0);
        let bottom = g.items().iter().map(|i| i.frame.max_y()).fold(0.0, f64::max);
        assert!((g.content_height() - (bottom + PADDING)).abs() < 1e-9);
        assert_eq!(g.max_scroll(180.0, 1e9), 0.0);
        assert!((g.max_scroll(180.0, 176.0) - (180.0 + g.content_height() - 176.0)).abs() < 1e-9);
    }

    #[test]
    fn visible_band_filters_items() {
        let g = GridLayout::new(320.0);
        let first_row: Vec<usize> = g.visible(0.0, PADDING + 1.0).map(|i| i.id).collect();
        assert_eq!(first_row, vec![0, 1]);
        assert_eq!(g.visible(1e9, 2e9).count(), 0);
    }

    #[test]
    fn labels_skip_occluded_cards() {
        let g = GridLayout::new(320.0);
        let area = Rect::new(0, 0, 80, 22);
        let mut buf = Buffer::empty(area);
        g.render_labels(area, &mut buf, 0.0, &[]);
        assert_eq!(buf[(2, 1)].symbol(), " ");
        assert_eq!(buf[(3, 1)].symbol(), "0");

        let mut covered = Buffer::empty(area);
        g.render_labels(area, &mut covered, 0.0, &[Frame::new(0.0, 0.0, 160.0, 40.0)]);
        assert_eq!(covered[(3, 1)].symbol(), " ");
    }
}
