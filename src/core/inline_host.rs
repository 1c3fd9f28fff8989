//! The embedded container that normally owns the video surface.
//!
//! Scroll ticks only ever touch this container's own transform and shadow;
//! the surface fills the container at identity, so the shrink is authored in
//! one place and scroll handling is safe whichever host owns the surface.

use super::geometry::{
    shadow_for, transform_for, Frame, ParallaxStyle, Placement, Point, ScrollProgress, Shadow, Transform,
    INLINE_ASPECT,
};
use super::surface::{HostId, SharedVideoSurface};

/// Hand-off from the inline container to the transition coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandRequest {
    /// Window-space rectangle the container currently occupies on screen,
    /// scroll shrink included.
    pub source_frame: Frame,
}

#[derive(Debug, Clone)]
pub struct InlineHost {
    /// Laid-out frame in window space, before the cosmetic transform.
    frame: Frame,
    style: ParallaxStyle,
    /// Last scroll sample `(offset, inset_top)`.
    scroll: (f64, f64),
    transform: Transform,
    shadow: Shadow,
}

impl InlineHost {
    /// A container whose top-left corner sits at `origin` in window space.
    /// It has no size until the first [`InlineHost::on_layout_change`].
    pub fn new(origin: Point, style: ParallaxStyle) -> Self {
        Self {
            frame: Frame::new(origin.x, origin.y, 0.0, 0.0),
            style,
            scroll: (0.0, 0.0),
            transform: Transform::IDENTITY,
            shadow: shadow_for(ScrollProgress::ZERO),
        }
    }

    /// Width changed: resize to the fixed 16:9 aspect and return the new full
    /// height, which the scroll source uses as its top inset.
    ///
    /// If the surface is parked here its frame is snapped to the new bounds.
    /// While a transition is in flight the surface lives on the transition
    /// layer, so that case is excluded by the ownership check.
    pub fn on_layout_change(&mut self, width: f64, surface: &mut SharedVideoSurface) -> f64 {
        let width = width.max(0.0);
        self.frame.width = width;
        self.frame.height = width * INLINE_ASPECT;
        let (offset, inset) = self.scroll;
        self.apply_scroll(offset, inset);
        if surface.is_attached_to(HostId::Inline) {
            surface.attach(HostId::Inline, self.bounds());
        }
        tracing::debug!(width, full_height = self.frame.height, "inline layout");
        self.frame.height
    }

    /// Scroll tick: recompute progress and restyle the container.
    pub fn on_scroll(&mut self, offset: f64, inset_top: f64) {
        self.scroll = (offset, inset_top);
        if self.full_height() <= 0.0 {
            return;
        }
        self.apply_scroll(offset, inset_top);
    }

    fn apply_scroll(&mut self, offset: f64, inset_top: f64) {
        let progress = ScrollProgress::from_scroll(offset, inset_top, self.full_height());
        self.transform = transform_for(progress, self.frame.size(), &self.style);
        self.shadow = shadow_for(progress);
    }

    /// Re-adopt the surface at the container's bounds, upright and untransformed.
    pub fn adopt(&self, surface: &mut SharedVideoSurface) {
        surface.attach(HostId::Inline, self.bounds());
    }

    /// Snapshot the live on-screen rectangle for an expand.
    ///
    /// While the surface is parked here this is the surface's own frame
    /// carried through the container transform, so expanding from a partly
    /// shrunk container starts exactly where the user sees it.
    pub fn expand_request(&self, surface: &SharedVideoSurface) -> ExpandRequest {
        let source_frame = if surface.is_attached_to(HostId::Inline) {
            surface.current_frame_in(&self.placement(), &Placement::WINDOW)
        } else {
            self.on_screen_frame()
        };
        ExpandRequest { source_frame }
    }

    /// Where the container appears in window space right now.
    pub fn on_screen_frame(&self) -> Frame {
        self.transform.apply(self.frame)
    }

    #[cfg(test)]
    pub fn progress(&self) -> ScrollProgress {
        let (offset, inset) = self.scroll;
        ScrollProgress::from_scroll(offset, inset, self.full_height())
    }

    pub fn full_height(&self) -> f64 {
        self.frame.height
    }

    /// Local bounds, which are the surface's frame while parked here.
    pub fn bounds(&self) -> Frame {
        Frame::from_size(self.frame.size())
    }

    #[cfg(test)]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn shadow(&self) -> Shadow {
        self.shadow
    }

    pub fn placement(&self) -> Placement {
        Placement::new(self.frame, self.transform)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.on_screen_frame().contains(p)
    }
}
