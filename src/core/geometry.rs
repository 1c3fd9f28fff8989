//! Scroll-driven parallax math and the small geometry vocabulary the rest of
//! the engine speaks.
//!
//! Everything here is pure: no state, no side effects.  Coordinates are in
//! points with the origin at the top-left and `y` growing downward.

use std::f64::consts::FRAC_PI_2;

/// Fixed aspect ratio of the inline container (height = width × 9/16).
pub const INLINE_ASPECT: f64 = 9.0 / 16.0;

/// Rotation of the fullscreen presentation.
pub const QUARTER_TURN: f64 = FRAC_PI_2;

// ───────────────────────────────────────── primitives ────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width and height swapped.
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` anchored at the origin (a container's bounds).
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// Component-wise equality within `eps`.
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Frame, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

// ───────────────────────────────────────── transform ─────────

/// Scale + translate applied to a container about its own centre.
///
/// `scale_x == scale_y` for everything [`transform_for`] produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    #[cfg(test)]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Where a view laid out at `frame` actually appears once this transform
    /// is applied about the frame's centre.
    pub fn apply(&self, frame: Frame) -> Frame {
        let c = frame.center();
        Frame::from_center(
            Point::new(c.x + self.translate_x, c.y + self.translate_y),
            Size::new(frame.width * self.scale_x, frame.height * self.scale_y),
        )
    }
}

// ───────────────────────────────────────── placement ─────────

/// Where a container's local space sits in window space: its laid-out frame
/// plus the cosmetic transform applied about that frame's centre.
///
/// Local coordinates are relative to the container's bounds, so `(0, 0)` is
/// the container's own top-left corner before the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub frame: Frame,
    pub transform: Transform,
}

impl Placement {
    /// Window space itself.
    pub const WINDOW: Placement = Placement {
        frame: Frame::new(0.0, 0.0, 0.0, 0.0),
        transform: Transform::IDENTITY,
    };

    pub fn new(frame: Frame, transform: Transform) -> Self {
        Self { frame, transform }
    }

    pub fn point_to_window(&self, p: Point) -> Point {
        let c = self.frame.center();
        let t = &self.transform;
        Point::new(
            c.x + t.translate_x + t.scale_x * (p.x - self.frame.width / 2.0),
            c.y + t.translate_y + t.scale_y * (p.y - self.frame.height / 2.0),
        )
    }

    pub fn point_from_window(&self, p: Point) -> Point {
        let c = self.frame.center();
        let t = &self.transform;
        Point::new(
            (p.x - c.x - t.translate_x) / t.scale_x + self.frame.width / 2.0,
            (p.y - c.y - t.translate_y) / t.scale_y + self.frame.height / 2.0,
        )
    }

    pub fn size_to_window(&self, s: Size) -> Size {
        Size::new(s.width * self.transform.scale_x, s.height * self.transform.scale_y)
    }

    pub fn size_from_window(&self, s: Size) -> Size {
        Size::new(s.width / self.transform.scale_x, s.height / self.transform.scale_y)
    }

    pub fn frame_to_window(&self, f: Frame) -> Frame {
        Frame::from_center(self.point_to_window(f.center()), self.size_to_window(f.size()))
    }

    pub fn frame_from_window(&self, f: Frame) -> Frame {
        Frame::from_center(self.point_from_window(f.center()), self.size_from_window(f.size()))
    }
}

// ───────────────────────────────────────── scroll progress ───

/// How far the inline container has shrunk, always within `[0, 1]`.
///
/// Derived on every scroll tick and never stored; construct it only through
/// [`ScrollProgress::from_scroll`] or [`ScrollProgress::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ScrollProgress(f64);

impl ScrollProgress {
    pub const ZERO: ScrollProgress = ScrollProgress(0.0);
    #[cfg(test)]
    pub const FULL: ScrollProgress = ScrollProgress(1.0);

    /// `(offset + inset_top) / full_height`, clamped.  A non-positive
    /// `full_height` (no layout yet) yields zero.
    pub fn from_scroll(offset: f64, inset_top: f64, full_height: f64) -> Self {
        if full_height <= 0.0 {
            return Self::ZERO;
        }
        Self::clamped((offset + inset_top) / full_height)
    }

    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

// ───────────────────────────────────────── parallax ──────────

/// Tunables for the scroll-driven shrink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxStyle {
    /// Scale at full progress.
    pub min_scale: f64,
    /// Inset from the top-left corner at full progress, in points.
    pub max_padding: f64,
}

impl Default for ParallaxStyle {
    fn default() -> Self {
        Self {
            min_scale: 0.4,
            max_padding: 8.0,
        }
    }
}

/// Drop shadow under the shrunken container.  Only the opacity tracks progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub opacity: f64,
    pub offset: Point,
    pub radius: f64,
}

pub const SHADOW_OFFSET: Point = Point::new(0.0, 4.0);
pub const SHADOW_RADIUS: f64 = 8.0;
const MAX_SHADOW_OPACITY: f64 = 0.3;

/// Container transform for `progress`.
///
/// Scales uniformly and translates so the shrunken container hugs the
/// top-left corner, inset by a padding that grows with progress.
pub fn transform_for(progress: ScrollProgress, container: Size, style: &ParallaxStyle) -> Transform {
    let p = progress.value();
    let scale = 1.0 - p * (1.0 - style.min_scale);
    let padding = style.max_padding * p;
    Transform {
        scale_x: scale,
        scale_y: scale,
        translate_x: -container.width * (1.0 - scale) / 2.0 + padding,
        translate_y: -container.height * (1.0 - scale) / 2.0 + padding,
    }
}

/// Linear in progress, independent of scale.
pub fn shadow_opacity_for(progress: ScrollProgress) -> f64 {
    progress.value() * MAX_SHADOW_OPACITY
}

pub fn shadow_for(progress: ScrollProgress) -> Shadow {
    Shadow {
        opacity: shadow_opacity_for(progress),
        offset: SHADOW_OFFSET,
        radius: SHADOW_RADIUS,
    }
}

/// Linear interpolation; `t` outside `[0, 1]` extrapolates.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    (to - from).mul_add(t, from)
}
