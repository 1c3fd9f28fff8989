//! Draws the stage: grid cards, the inline container with its shadow, the
//! fullscreen backdrop, and the shared surface wherever it currently lives.
//!
//! The surface is sampled through its full geometry (centre, bounds,
//! rotation), so a mid-flight frame on the transition layer renders as the
//! tilted, resized picture it is.

use std::f64::consts::TAU;
use std::time::Duration;

use image::{Rgb, RgbImage};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use super::canvas::Canvas;
use super::grid::GridLayout;
use super::layout::{pixel_center, pixel_span, POINTS_PER_ROW};
use super::theme::Theme;
use crate::core::geometry::Frame;
use crate::core::stage::{Space, Stage};
use crate::core::surface::{HostId, SurfaceGeometry};

// ───────────────────────────────────────── test card ─────────

/// Synthetic picture standing in for decoded video: colour bars, a grey
/// ramp and a marker that sweeps with the playback clock.
pub struct TestCard;

impl TestCard {
    pub const WIDTH: u32 = 128;
    pub const HEIGHT: u32 = 72;
    const SWEEP: Duration = Duration::from_secs(4);

    const BARS: [Rgb<u8>; 7] = [
        Rgb([192, 192, 192]),
        Rgb([192, 192, 0]),
        Rgb([0, 192, 192]),
        Rgb([0, 192, 0]),
        Rgb([192, 0, 192]),
        Rgb([192, 0, 0]),
        Rgb([0, 0, 192]),
    ];

    pub fn frame(clock: Duration) -> RgbImage {
        let phase = (clock.as_secs_f64() / Self::SWEEP.as_secs_f64()).fract();
        // Marker travels left → right → left.
        let marker_x = ((1.0 - (phase * TAU).cos()) / 2.0 * f64::from(Self::WIDTH - 8)) as u32;
        let bars_bottom = Self::HEIGHT * 2 / 3;

        RgbImage::from_fn(Self::WIDTH, Self::HEIGHT, |x, y| {
            if y < bars_bottom {
                let bar = (x * Self::BARS.len() as u32 / Self::WIDTH) as usize;
                Self::BARS[bar.min(Self::BARS.len() - 1)]
            } else if (marker_x..marker_x + 8).contains(&x) && y >= Self::HEIGHT - 12 {
                Rgb([255, 255, 255])
            } else {
                let level = (x * 255 / (Self::WIDTH - 1)) as u8;
                Rgb([level, level, level])
            }
        })
    }
}

/// Paint `picture` mapped onto `geometry` (stage points).
pub fn paint_surface(canvas: &mut Canvas, geometry: &SurfaceGeometry, picture: &RgbImage) {
    let size = geometry.size;
    if size.width <= 0.0 || size.height <= 0.0 || picture.width() == 0 || picture.height() == 0 {
        return;
    }
    let bounds = geometry.frame();
    let (sin, cos) = geometry.rotation.sin_cos();
    let (x0, x1) = pixel_span(bounds.x, bounds.max_x(), canvas.width());
    let (y0, y1) = pixel_span(bounds.y, bounds.max_y(), canvas.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let p = pixel_center(x, y);
            let dx = p.x - geometry.center.x;
            let dy = p.y - geometry.center.y;
            // Undo the clockwise rotation to get picture-local coordinates.
            let u = (dx * cos + dy * sin) / size.width + 0.5;
            let v = (-dx * sin + dy * cos) / size.height + 0.5;
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }
            let sx = ((u * f64::from(picture.width())) as u32).min(picture.width() - 1);
            let sy = ((v * f64::from(picture.height())) as u32).min(picture.height() - 1);
            canvas.put(x, y, *picture.get_pixel(sx, sy));
        }
    }
}

// ───────────────────────────────────────── stage widget ──────

pub struct StageView<'a> {
    stage: &'a Stage,
    grid: &'a GridLayout,
    /// Stage y of the grid's top edge.
    content_top: f64,
    picture: &'a RgbImage,
}

impl<'a> StageView<'a> {
    pub fn new(stage: &'a Stage, grid: &'a GridLayout, content_top: f64, picture: &'a RgbImage) -> Self {
        Self {
            stage,
            grid,
            content_top,
            picture,
        }
    }
}

impl Widget for StageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let viewport_height = f64::from(area.height) * POINTS_PER_ROW;
        let mut canvas = Canvas::new(area, Theme::BACKGROUND);

        self.grid.paint(&mut canvas, self.content_top, viewport_height);

        // The inline container stays on screen whoever owns the surface.
        let inline = &self.stage.inline;
        let container = inline.on_screen_frame();
        let shadow = inline.shadow();
        let shadow_frame = Frame::new(
            container.x + shadow.offset.x,
            container.y + shadow.offset.y,
            container.width,
            container.height,
        );
        canvas.shadow(shadow_frame, shadow.opacity, shadow.radius, Theme::SHADOW);
        canvas.fill_frame(container, Theme::PLACEHOLDER);

        let backdrop = self
            .stage
            .fullscreen
            .as_ref()
            .filter(|fullscreen| !fullscreen.is_hidden())
            .map_or(0.0, |fullscreen| fullscreen.alpha());
        canvas.wash(Theme::BACKDROP, backdrop);

        let surface = self.stage.surface_geometry_in(Space::Window);
        paint_surface(&mut canvas, &surface, self.picture);

        canvas.flush(area, buf);

        // Labels only while the grid is plainly visible.
        if backdrop <= 0.0 {
            let mut occluded = vec![self.stage.surface_frame_in(Space::Window)];
            if self.stage.owner() == HostId::Inline {
                let r = shadow.radius;
                occluded.push(Frame::new(
                    container.x - r,
                    container.y - r,
                    container.width + 2.0 * r,
                    container.height + 2.0 * r + shadow.offset.y,
                ));
            } else {
                occluded.push(container);
            }
            self.grid.render_labels(area, buf, self.content_top, &occluded);
        }
    }
}
