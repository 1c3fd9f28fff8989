//! Half-block pixel canvas covering the stage.
//!
//! Each terminal cell holds two vertically stacked pixels (`▀` with the top
//! pixel as foreground and the bottom one as background), so a pixel is
//! `POINTS_PER_PIXEL` points square.  Everything on the stage is painted into
//! one [`RgbImage`] in point space and flushed to the buffer once per frame.

use image::{Rgb, RgbImage};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};

use super::layout::{pixel_span, POINTS_PER_PIXEL};
use super::theme::to_color;
use crate::core::geometry::Frame;

pub struct Canvas {
    pixels: RgbImage,
}

impl Canvas {
    /// A canvas for `area`, filled with `background`.
    pub fn new(area: Rect, background: Rgb<u8>) -> Self {
        let w = u32::from(area.width);
        let h = u32::from(area.height) * 2;
        Self {
            pixels: RgbImage::from_pixel(w, h, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn put(&mut self, x: u32, y: u32, colour: Rgb<u8>) {
        if let Some(p) = self.pixels.get_pixel_mut_checked(x, y) {
            *p = colour;
        }
    }

    /// Alpha-composite `colour` over pixel `(x, y)`.
    pub fn blend(&mut self, x: u32, y: u32, colour: Rgb<u8>, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        if let Some(p) = self.pixels.get_pixel_mut_checked(x, y) {
            *p = mix(*p, colour, alpha);
        }
    }

    /// Fill every pixel whose centre lies inside `frame` (stage points).
    pub fn fill_frame(&mut self, frame: Frame, colour: Rgb<u8>) {
        let (x0, x1) = pixel_span(frame.x, frame.max_x(), self.width());
        let (y0, y1) = pixel_span(frame.y, frame.max_y(), self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                if frame.contains(super::layout::pixel_center(x, y)) {
                    self.put(x, y, colour);
                }
            }
        }
    }

    /// Composite `colour` over the whole canvas.
    pub fn wash(&mut self, colour: Rgb<u8>, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        for p in self.pixels.pixels_mut() {
            *p = mix(*p, colour, alpha);
        }
    }

    /// Soft shadow: full `opacity` inside `frame`, fading to nothing over
    /// `radius` points outside it.
    pub fn shadow(&mut self, frame: Frame, opacity: f64, radius: f64, colour: Rgb<u8>) {
        if opacity <= 0.0 {
            return;
        }
        let (x0, x1) = pixel_span(frame.x - radius, frame.max_x() + radius, self.width());
        let (y0, y1) = pixel_span(frame.y - radius, frame.max_y() + radius, self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                let c = super::layout::pixel_center(x, y);
                let dx = (frame.x - c.x).max(c.x - frame.max_x()).max(0.0);
                let dy = (frame.y - c.y).max(c.y - frame.max_y()).max(0.0);
                let d = dx.hypot(dy);
                if d < radius.max(POINTS_PER_PIXEL) {
                    let falloff = if radius > 0.0 { 1.0 - d / radius } else { 1.0 };
                    self.blend(x, y, colour, opacity * falloff);
                }
            }
        }
    }

    /// Write the canvas into `buf` as half-block cells.
    pub fn flush(&self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            let yt = u32::from(row) * 2;
            for col in 0..area.width {
                let x = u32::from(col);
                let (Some(top), Some(bottom)) = (self.pixel(x, yt), self.pixel(x, yt + 1)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) {
                    cell.set_char('▀').set_fg(to_color(top)).set_bg(to_color(bottom));
                }
            }
        }
    }
}

/// `over` composited onto `under` at `alpha`.
pub fn mix(under: Rgb<u8>, over: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    let channel = |u: u8, o: u8| (f64::from(u) + (f64::from(o) - f64::from(u)) * alpha).round() as u8;
    Rgb([
        channel(under[0], over[0]),
        channel(under[1], over[1]),
        channel(under[2], over[2]),
    ])
}
