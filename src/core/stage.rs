//! Every participant of the video presentation in one place: the surface,
//! both hosts, and the transient transition layer.
//!
//! The stage owns the single [`SharedVideoSurface`] and hands it to hosts and
//! the coordinator by `&mut`, so ownership moves are always explicit.

use super::fullscreen_host::FullscreenHost;
use super::geometry::{Frame, ParallaxStyle, Placement, Point, Size, Transform};
use super::inline_host::InlineHost;
use super::surface::{HostId, PlaybackHandle, SharedVideoSurface, SurfaceGeometry};

/// Window-space container that holds the surface only while an animation
/// is in flight.
#[derive(Debug, Clone)]
pub struct TransitionLayer {
    bounds: Size,
}

impl TransitionLayer {
    #[cfg(test)]
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Covers the window from its origin, untransformed.
    pub fn placement(&self) -> Placement {
        Placement::new(Frame::from_size(self.bounds), Transform::IDENTITY)
    }
}

/// A coordinate space a frame can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Window,
    Host(HostId),
}

#[derive(Debug)]
pub struct Stage {
    screen: Size,
    pub surface: SharedVideoSurface,
    pub inline: InlineHost,
    /// Present only while the fullscreen presentation exists.
    pub fullscreen: Option<FullscreenHost>,
    pub layer: TransitionLayer,
}

impl Stage {
    /// Build the stage with the surface parked inline, laid out for `screen`.
    pub fn new(screen: Size, inline_origin: Point, style: ParallaxStyle, playback: PlaybackHandle) -> Self {
        let mut stage = Self {
            screen,
            surface: SharedVideoSurface::new(playback, HostId::Inline, Frame::default()),
            inline: InlineHost::new(inline_origin, style),
            fullscreen: None,
            layer: TransitionLayer { bounds: screen },
        };
        stage.resize(screen);
        stage
    }

    /// Layout pass: refresh every host's static geometry.  Returns the inline
    /// full height (the scroll inset).
    pub fn resize(&mut self, screen: Size) -> f64 {
        self.screen = screen;
        self.layer.bounds = screen;
        if let Some(fullscreen) = self.fullscreen.as_mut() {
            fullscreen.on_size_change(screen, &mut self.surface);
        }
        self.inline.on_layout_change(screen.width, &mut self.surface)
    }

    /// Create the fullscreen presentation for an upcoming expand.  Reuses an
    /// existing one.  A new host starts transparent, so nothing shows before
    /// the present animation fades it in.
    pub fn prepare_fullscreen(&mut self) -> &mut FullscreenHost {
        let screen = self.screen;
        self.fullscreen.get_or_insert_with(|| {
            let mut host = FullscreenHost::new(screen);
            host.set_alpha(0.0);
            host
        })
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn owner(&self) -> HostId {
        self.surface.parent()
    }

    /// Placement of `host`'s local space.  A missing fullscreen host falls
    /// back to window space, which is what it would cover.
    pub fn placement_of(&self, host: HostId) -> Placement {
        match host {
            HostId::Inline => self.inline.placement(),
            HostId::Fullscreen => self
                .fullscreen
                .as_ref()
                .map_or(Placement::WINDOW, FullscreenHost::placement),
            HostId::TransitionLayer => self.layer.placement(),
        }
    }

    fn placement_of_space(&self, space: Space) -> Placement {
        match space {
            Space::Window => Placement::WINDOW,
            Space::Host(host) => self.placement_of(host),
        }
    }

    /// Re-express `frame` from the `from` space in the `to` space.
    pub fn convert_frame(&self, frame: Frame, from: Space, to: Space) -> Frame {
        let window = self.placement_of_space(from).frame_to_window(frame);
        self.placement_of_space(to).frame_from_window(window)
    }

    /// The surface's bounding frame converted into `space`.
    pub fn surface_frame_in(&self, space: Space) -> Frame {
        let parent = self.placement_of(self.surface.parent());
        self.surface.current_frame_in(&parent, &self.placement_of_space(space))
    }

    /// Full surface geometry, rotation included, converted into `space`.
    pub fn surface_geometry_in(&self, space: Space) -> SurfaceGeometry {
        let parent = self.placement_of(self.surface.parent());
        self.surface.current_geometry_in(&parent, &self.placement_of_space(space))
    }
}
