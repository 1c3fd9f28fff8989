//! The single long-lived view that hosts video output.
//!
//! The surface is created once and moved between containers by changing its
//! parent slot; it is never destroyed or recreated by a host.  The parent is
//! not optional, so "no parent" and "two parents" are unrepresentable.

use std::fmt;

use super::geometry::{lerp, Frame, Placement, Point, Size};

/// The containers that can own the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostId {
    Inline,
    Fullscreen,
    /// Transient container used only while an animation is in flight.
    TransitionLayer,
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HostId::Inline => "inline",
            HostId::Fullscreen => "fullscreen",
            HostId::TransitionLayer => "transition-layer",
        })
    }
}

/// Opaque handle to the playback engine.  Geometry code never starts, stops
/// or seeks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackHandle {
    media_url: String,
}

impl PlaybackHandle {
    pub fn open(media_url: impl Into<String>) -> Self {
        Self {
            media_url: media_url.into(),
        }
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }
}

// ───────────────────────────────────────── geometry ──────────

/// Bounds/centre/rotation description of the surface, expressed in its
/// parent's coordinate space.
///
/// `size` is the unrotated bounds; `rotation` is in radians, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceGeometry {
    pub center: Point,
    pub size: Size,
    pub rotation: f64,
}

impl SurfaceGeometry {
    pub fn new(center: Point, size: Size, rotation: f64) -> Self {
        Self { center, size, rotation }
    }

    /// Axis-aligned bounding box of the (possibly rotated) surface.
    pub fn frame(&self) -> Frame {
        let (sin, cos) = self.rotation.sin_cos();
        let w = self.size.width * cos.abs() + self.size.height * sin.abs();
        let h = self.size.width * sin.abs() + self.size.height * cos.abs();
        Frame::from_center(self.center, Size::new(w, h))
    }

    #[cfg(test)]
    pub fn is_upright(&self) -> bool {
        self.rotation == 0.0
    }

    /// Interpolates centre, bounds and rotation together.  `t` is not clamped
    /// so spring overshoot carries through.
    pub fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            center: Point::new(lerp(from.center.x, to.center.x, t), lerp(from.center.y, to.center.y, t)),
            size: Size::new(lerp(from.size.width, to.size.width, t), lerp(from.size.height, to.size.height, t)),
            rotation: lerp(from.rotation, to.rotation, t),
        }
    }

    /// Re-express this geometry from the `from` space in the `to` space.
    pub fn convert(&self, from: &Placement, to: &Placement) -> Self {
        let center = to.point_from_window(from.point_to_window(self.center));
        let size = to.size_from_window(from.size_to_window(self.size));
        Self::new(center, size, self.rotation)
    }
}

impl From<Frame> for SurfaceGeometry {
    /// Upright geometry filling `frame`, i.e. the identity-transform attach.
    fn from(frame: Frame) -> Self {
        Self::new(frame.center(), frame.size(), 0.0)
    }
}

// ───────────────────────────────────────── surface ───────────

/// What an [`SharedVideoSurface::attach`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// Ownership moved from the given host.
    Reparented { from: HostId },
    /// Already owned by the target; only the geometry changed.
    Updated,
}

#[derive(Debug)]
pub struct SharedVideoSurface {
    playback: PlaybackHandle,
    parent: HostId,
    geometry: SurfaceGeometry,
    /// Number of ownership transfers so far.
    transfers: u64,
}

impl SharedVideoSurface {
    pub fn new(playback: PlaybackHandle, host: HostId, frame: Frame) -> Self {
        Self {
            playback,
            parent: host,
            geometry: frame.into(),
            transfers: 0,
        }
    }

    /// Move the surface under `host` at `geometry`.
    ///
    /// Attaching to the current parent is a geometry update, not a reparent.
    /// Passing a [`Frame`] gives the upright, untransformed placement.
    pub fn attach(&mut self, host: HostId, geometry: impl Into<SurfaceGeometry>) -> Attach {
        self.geometry = geometry.into();
        if self.parent == host {
            return Attach::Updated;
        }
        let from = std::mem::replace(&mut self.parent, host);
        self.transfers += 1;
        tracing::trace!(%from, to = %host, transfers = self.transfers, "surface reparented");
        Attach::Reparented { from }
    }

    pub fn parent(&self) -> HostId {
        self.parent
    }

    pub fn is_attached_to(&self, host: HostId) -> bool {
        self.parent == host
    }

    #[cfg(test)]
    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// Bounding frame in the parent's space.
    #[cfg(test)]
    pub fn frame(&self) -> Frame {
        self.geometry.frame()
    }

    pub fn playback(&self) -> &PlaybackHandle {
        &self.playback
    }

    #[cfg(test)]
    pub fn transfers(&self) -> u64 {
        self.transfers
    }

    /// Current geometry converted from the parent's space (`parent`) into
    /// `target`.  Reads geometry without touching ownership.
    pub fn current_geometry_in(&self, parent: &Placement, target: &Placement) -> SurfaceGeometry {
        self.geometry.convert(parent, target)
    }

    /// Bounding frame of [`SharedVideoSurface::current_geometry_in`].
    pub fn current_frame_in(&self, parent: &Placement, target: &Placement) -> Frame {
        self.current_geometry_in(parent, target).frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Transform, QUARTER_TURN};

    fn surface() -> SharedVideoSurface {
        SharedVideoSurface::new(
            PlaybackHandle::open("https://example.invalid/stream.m3u8"),
            HostId::Inline,
            Frame::new(0.0, 0.0, 320.0, 180.0),
        )
    }

    #[test]
    fn attach_to_current_parent_is_an_update() {
        let mut s = surface();
        let r = s.attach(HostId::Inline, Frame::new(0.0, 0.0, 160.0, 90.0));
        assert_eq!(r, Attach::Updated);
        assert_eq!(s.transfers(), 0);
        assert_eq!(s.frame(), Frame::new(0.0, 0.0, 160.0, 90.0));
    }

    #[test]
    fn attach_elsewhere_reparents_and_resets_rotation() {
        let mut s = surface();
        let rotated = SurfaceGeometry::new(Point::new(100.0, 200.0), Size::new(400.0, 200.0), QUARTER_TURN);
        assert_eq!(s.attach(HostId::Fullscreen, rotated), Attach::Reparented { from: HostId::Inline });
        assert_eq!(s.parent(), HostId::Fullscreen);
        assert!(s.frame().approx_eq(&Frame::new(0.0, 0.0, 200.0, 400.0), 1e-9));

        s.attach(HostId::Inline, Frame::new(0.0, 0.0, 320.0, 180.0));
        assert!(s.geometry().is_upright());
        assert_eq!(s.transfers(), 2);
        assert_eq!(s.playback().media_url(), "https://example.invalid/stream.m3u8");
    }

    #[test]
    fn current_frame_in_window_includes_parent_transform() {
        let s = surface();
        let parent = Placement::new(
            Frame::new(0.0, 50.0, 320.0, 180.0),
            Transform {
                scale_x: 0.5,
                scale_y: 0.5,
                translate_x: -80.0,
                translate_y: -45.0,
            },
        );
        let on_screen = s.current_frame_in(&parent, &Placement::WINDOW);
        assert!(on_screen.approx_eq(&Frame::new(0.0, 50.0, 160.0, 90.0), 1e-9));
    }

    #[test]
    fn lerp_hits_both_ends() {
        let a = SurfaceGeometry::from(Frame::new(0.0, 0.0, 100.0, 50.0));
        let b = SurfaceGeometry::new(Point::new(200.0, 400.0), Size::new(800.0, 400.0), QUARTER_TURN);
        assert_eq!(SurfaceGeometry::lerp(&a, &b, 0.0), a);
        assert_eq!(SurfaceGeometry::lerp(&a, &b, 1.0), b);
        let mid = SurfaceGeometry::lerp(&a, &b, 0.5);
        assert!((mid.rotation - QUARTER_TURN / 2.0).abs() < 1e-12);
    }
}
