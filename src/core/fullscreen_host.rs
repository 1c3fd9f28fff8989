//! Full-screen presentation.  Defines the static rotated, screen-filling
//! layout and keeps the surface on it across size changes.  It never
//! animates; the coordinator owns all motion.

use super::geometry::{Frame, Placement, Point, Size, QUARTER_TURN};
use super::surface::{HostId, SharedVideoSurface, SurfaceGeometry};

/// Hand-off from the fullscreen presentation back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissRequest {
    _private: (),
}

#[derive(Debug, Clone)]
pub struct FullscreenHost {
    screen: Size,
    /// Backdrop opacity in `[0, 1]`.
    alpha: f64,
    hidden: bool,
}

impl FullscreenHost {
    pub fn new(screen: Size) -> Self {
        Self {
            screen,
            alpha: 1.0,
            hidden: false,
        }
    }

    /// Surface layout: bounds are the screen transposed, centred, then turned
    /// a quarter so a landscape picture fills a portrait screen.
    pub fn rotated_layout(&self) -> SurfaceGeometry {
        let screen = Frame::from_size(self.screen);
        SurfaceGeometry::new(screen.center(), self.screen.transposed(), QUARTER_TURN)
    }

    /// Take ownership of the surface at the rotated layout.
    pub fn take_over(&self, surface: &mut SharedVideoSurface) {
        surface.attach(HostId::Fullscreen, self.rotated_layout());
    }

    /// Screen size changed; re-apply the layout if the surface is ours.
    pub fn on_size_change(&mut self, screen: Size, surface: &mut SharedVideoSurface) {
        self.screen = screen;
        if surface.is_attached_to(HostId::Fullscreen) {
            self.take_over(surface);
        }
    }

    pub fn dismiss_request(&self) -> DismissRequest {
        DismissRequest { _private: () }
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn unhide(&mut self) {
        self.hidden = false;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[cfg(test)]
    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Covers the window from its origin, untransformed.
    pub fn placement(&self) -> Placement {
        Placement::new(Frame::from_size(self.screen), Default::default())
    }

    pub fn contains(&self, p: Point) -> bool {
        Frame::from_size(self.screen).contains(p)
    }
}
