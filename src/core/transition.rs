//! Shared-element transition between the inline and fullscreen hosts.
//!
//! ```text
//!   Idle ──request_expand──▶ Presenting ──finished──▶ Presented
//!    ▲                          │ interrupted            │
//!    │◀─────────────────────────┘                        │ request_dismiss
//!    │                                                   ▼
//!    └─────────────finished──────────────────────── Dismissing
//!                                    interrupted ──▶ Presented
//! ```
//!
//! One transition at a time.  A request in the wrong state is rejected, never
//! queued.  Whatever ends an animation (natural finish or interruption), the
//! surface leaves the transition layer and lands on a real host before the
//! caller's completion runs.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::fullscreen_host::DismissRequest;
use super::geometry::{lerp, Frame};
use super::inline_host::ExpandRequest;
use super::spring::{SpringAnimation, SpringTiming};
use super::stage::{Space, Stage};
use super::surface::{HostId, SurfaceGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Presenting,
    Presented,
    Dismissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Present,
    Dismiss,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransitionKind::Present => "present",
            TransitionKind::Dismiss => "dismiss",
        })
    }
}

/// A transition participant that was absent or not in the expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    /// No fullscreen host exists.
    FullscreenHost,
    /// The surface is not owned by the host the transition starts from.
    Surface { expected: HostId, found: HostId },
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::FullscreenHost => f.write_str("fullscreen host"),
            Participant::Surface { expected, found } => {
                write!(f, "surface owned by {found}, expected {expected}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{kind} rejected while {state:?}")]
    InvalidState { kind: TransitionKind, state: TransitionState },
    #[error("{kind} aborted: missing participant ({participant})")]
    MissingParticipant { kind: TransitionKind, participant: Participant },
}

/// What the caller learns when a transition ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionReport {
    pub id: TransitionId,
    pub kind: TransitionKind,
    /// `false` when the animation was interrupted.
    pub success: bool,
    pub state: TransitionState,
    pub owner: HostId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

/// Continuation run exactly once when a started transition ends.
pub type Completion = Box<dyn FnOnce(&TransitionReport)>;

// ───────────────────────────────────────── animation handle ──

/// Animated values at one instant.  Geometry is in transition-layer space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub geometry: SurfaceGeometry,
    pub backdrop_alpha: f64,
}

/// A spring driving one surface from `from` to `to`.
#[derive(Debug, Clone)]
pub struct AnimationHandle {
    kind: TransitionKind,
    spring: SpringAnimation,
    from: Keyframe,
    to: Keyframe,
}

/// Output of one [`AnimationHandle::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub keyframe: Keyframe,
    pub finished: bool,
}

impl AnimationHandle {
    pub fn new(kind: TransitionKind, timing: SpringTiming, from: Keyframe, to: Keyframe) -> Self {
        Self {
            kind,
            spring: SpringAnimation::new(timing),
            from,
            to,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    #[cfg(test)]
    pub fn from(&self) -> &Keyframe {
        &self.from
    }

    #[cfg(test)]
    pub fn to(&self) -> &Keyframe {
        &self.to
    }

    /// Advance the spring and interpolate.  Geometry follows the raw curve
    /// (overshoot included); opacity follows the clamped one.  Both come from
    /// the same sample, so on the finishing frame both equal `to` exactly.
    pub fn advance(&mut self, dt: Duration) -> AnimationFrame {
        let sample = self.spring.advance(dt);
        if sample.finished {
            return AnimationFrame {
                keyframe: self.to,
                finished: true,
            };
        }
        AnimationFrame {
            keyframe: Keyframe {
                geometry: SurfaceGeometry::lerp(&self.from.geometry, &self.to.geometry, sample.progress),
                backdrop_alpha: lerp(self.from.backdrop_alpha, self.to.backdrop_alpha, sample.clamped()),
            },
            finished: false,
        }
    }
}

// ───────────────────────────────────────── animator seam ─────

/// Everything an animator may touch while setting up a transition.
pub struct TransitionContext<'a> {
    pub stage: &'a mut Stage,
    /// Window-space rectangle of the inline container: the start of a
    /// present, the end of a dismiss.
    pub inline_frame: Frame,
}

/// Sets up the start state of a transition and describes its motion.
///
/// Implementations must validate every participant before mutating
/// anything, so an `Err` leaves the stage untouched.
pub trait TransitionAnimator {
    fn present_transition(&self, ctx: TransitionContext<'_>) -> Result<AnimationHandle, TransitionError>;
    fn dismiss_transition(&self, ctx: TransitionContext<'_>) -> Result<AnimationHandle, TransitionError>;
}

/// Moves the one surface between hosts, turning it a quarter on the way.
#[derive(Debug, Clone, Default)]
pub struct SharedElementAnimator {
    pub timing: SpringTiming,
}

impl SharedElementAnimator {
    pub fn new(timing: SpringTiming) -> Self {
        Self { timing }
    }
}

const LAYER: Space = Space::Host(HostId::TransitionLayer);

fn require_owner(stage: &Stage, kind: TransitionKind, expected: HostId) -> Result<(), TransitionError> {
    let found = stage.surface.parent();
    if found != expected {
        return Err(TransitionError::MissingParticipant {
            kind,
            participant: Participant::Surface { expected, found },
        });
    }
    Ok(())
}

impl TransitionAnimator for SharedElementAnimator {
    fn present_transition(&self, ctx: TransitionContext<'_>) -> Result<AnimationHandle, TransitionError> {
        let kind = TransitionKind::Present;
        let stage = ctx.stage;
        require_owner(stage, kind, HostId::Inline)?;
        let source = stage.convert_frame(ctx.inline_frame, Space::Window, LAYER);
        let Some(fullscreen) = stage.fullscreen.as_mut() else {
            return Err(TransitionError::MissingParticipant {
                kind,
                participant: Participant::FullscreenHost,
            });
        };

        // Destination waits invisibly behind the flying surface.
        fullscreen.unhide();
        fullscreen.set_alpha(0.0);
        let layer = stage.layer.placement();
        let target = fullscreen.rotated_layout().convert(&fullscreen.placement(), &layer);

        // The source frame is already the real on-screen rectangle, so the
        // surface starts upright and untransformed.
        let from = Keyframe {
            geometry: source.into(),
            backdrop_alpha: 0.0,
        };
        let to = Keyframe {
            geometry: target,
            backdrop_alpha: 1.0,
        };
        stage.surface.attach(HostId::TransitionLayer, from.geometry);
        Ok(AnimationHandle::new(kind, self.timing, from, to))
    }

    fn dismiss_transition(&self, ctx: TransitionContext<'_>) -> Result<AnimationHandle, TransitionError> {
        let kind = TransitionKind::Dismiss;
        let stage = ctx.stage;
        require_owner(stage, kind, HostId::Fullscreen)?;
        let target = stage.convert_frame(ctx.inline_frame, Space::Window, LAYER);
        let Some(fullscreen) = stage.fullscreen.as_mut() else {
            return Err(TransitionError::MissingParticipant {
                kind,
                participant: Participant::FullscreenHost,
            });
        };

        let layer = stage.layer.placement();
        let start = fullscreen.rotated_layout().convert(&fullscreen.placement(), &layer);
        fullscreen.hide();

        let from = Keyframe {
            geometry: start,
            backdrop_alpha: fullscreen.alpha(),
        };
        let to = Keyframe {
            geometry: target.into(),
            backdrop_alpha: fullscreen.alpha(),
        };
        stage.surface.attach(HostId::TransitionLayer, from.geometry);
        Ok(AnimationHandle::new(kind, self.timing, from, to))
    }
}

// ───────────────────────────────────────── coordinator ───────

struct InFlight {
    id: TransitionId,
    handle: AnimationHandle,
    completion: Completion,
}

/// Owns the transition state machine and the single in-flight animation.
pub struct TransitionCoordinator {
    state: TransitionState,
    animator: Box<dyn TransitionAnimator>,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl fmt::Debug for TransitionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionCoordinator")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.as_ref().map(|fl| fl.id))
            .finish()
    }
}

impl TransitionCoordinator {
    pub fn new(animator: impl TransitionAnimator + 'static) -> Self {
        Self {
            state: TransitionState::Idle,
            animator: Box::new(animator),
            in_flight: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The running animation, if any.
    #[cfg(test)]
    pub fn animation(&self) -> Option<&AnimationHandle> {
        self.in_flight.as_ref().map(|fl| &fl.handle)
    }

    /// Idle → Presenting.  The source frame is taken from `request` as-is;
    /// a fullscreen host must already exist on the stage.
    pub fn request_expand(
        &mut self,
        stage: &mut Stage,
        request: ExpandRequest,
        completion: impl FnOnce(&TransitionReport) + 'static,
    ) -> Result<TransitionId, TransitionError> {
        self.start(stage, TransitionKind::Present, request.source_frame, Box::new(completion))
    }

    /// Presented → Dismissing.  The inline target is re-read from the stage
    /// now, since the content may have scrolled while fullscreen.
    pub fn request_dismiss(
        &mut self,
        stage: &mut Stage,
        _request: DismissRequest,
        completion: impl FnOnce(&TransitionReport) + 'static,
    ) -> Result<TransitionId, TransitionError> {
        let target = stage.inline.on_screen_frame();
        self.start(stage, TransitionKind::Dismiss, target, Box::new(completion))
    }

    fn start(
        &mut self,
        stage: &mut Stage,
        kind: TransitionKind,
        inline_frame: Frame,
        completion: Completion,
    ) -> Result<TransitionId, TransitionError> {
        let accepting = match kind {
            TransitionKind::Present => TransitionState::Idle,
            TransitionKind::Dismiss => TransitionState::Presented,
        };
        if self.state != accepting || self.in_flight.is_some() {
            let err = TransitionError::InvalidState { kind, state: self.state };
            tracing::debug!("{err}");
            return Err(err);
        }

        let ctx = TransitionContext { stage, inline_frame };
        let handle = match kind {
            TransitionKind::Present => self.animator.present_transition(ctx),
            TransitionKind::Dismiss => self.animator.dismiss_transition(ctx),
        }
        .inspect_err(|err| tracing::warn!("{err}"))?;

        let id = TransitionId(self.next_id);
        self.next_id += 1;
        self.state = match kind {
            TransitionKind::Present => TransitionState::Presenting,
            TransitionKind::Dismiss => TransitionState::Dismissing,
        };
        tracing::info!(id = id.0, %kind, ?inline_frame, "transition started");
        self.in_flight = Some(InFlight { id, handle, completion });
        Ok(id)
    }

    /// Frame-clock tick.  Moves the surface along the curve and, on the
    /// finishing frame, runs the hand-off and returns its report.
    pub fn tick(&mut self, stage: &mut Stage, dt: Duration) -> Option<TransitionReport> {
        let flight = self.in_flight.as_mut()?;
        let frame = flight.handle.advance(dt);

        if stage.surface.is_attached_to(HostId::TransitionLayer) {
            stage.surface.attach(HostId::TransitionLayer, frame.keyframe.geometry);
        } else {
            tracing::warn!(owner = %stage.surface.parent(), "surface left the transition layer mid-flight");
        }
        if flight.handle.kind() == TransitionKind::Present {
            if let Some(fullscreen) = stage.fullscreen.as_mut() {
                fullscreen.set_alpha(frame.keyframe.backdrop_alpha);
            }
        }

        if frame.finished {
            return self.finish(stage, false);
        }
        None
    }

    /// Platform interruption: end the in-flight transition now.  The full
    /// hand-off still runs; the report carries `success = false`.
    pub fn interrupt(&mut self, stage: &mut Stage) -> Option<TransitionReport> {
        self.finish(stage, true)
    }

    fn finish(&mut self, stage: &mut Stage, cancelled: bool) -> Option<TransitionReport> {
        let flight = self.in_flight.take()?;
        let kind = flight.handle.kind();

        // Finished presents and interrupted dismisses end fullscreen;
        // the other two end inline.
        self.state = match (kind, cancelled) {
            (TransitionKind::Present, false) | (TransitionKind::Dismiss, true) => land_fullscreen(stage),
            (TransitionKind::Present, true) | (TransitionKind::Dismiss, false) => land_inline(stage),
        };
        if stage.surface.is_attached_to(HostId::TransitionLayer) {
            tracing::warn!("hand-off left the surface on the transition layer; re-homing inline");
            self.state = land_inline(stage);
        }

        let report = TransitionReport {
            id: flight.id,
            kind,
            success: !cancelled,
            state: self.state,
            owner: stage.surface.parent(),
        };
        if cancelled {
            tracing::warn!(id = flight.id.0, %kind, state = ?report.state, "transition interrupted");
        } else {
            tracing::info!(id = flight.id.0, %kind, state = ?report.state, "transition finished");
        }
        (flight.completion)(&report);
        Some(report)
    }
}

fn land_fullscreen(stage: &mut Stage) -> TransitionState {
    match stage.fullscreen.as_mut() {
        Some(fullscreen) => {
            fullscreen.unhide();
            fullscreen.set_alpha(1.0);
            fullscreen.take_over(&mut stage.surface);
            TransitionState::Presented
        }
        None => land_inline(stage),
    }
}

fn land_inline(stage: &mut Stage) -> TransitionState {
    stage.inline.adopt(&mut stage.surface);
    stage.fullscreen = None;
    TransitionState::Idle
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::geometry::{ParallaxStyle, Point, Size, QUARTER_TURN};
    use crate::core::surface::PlaybackHandle;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn stage() -> Stage {
        Stage::new(
            Size::new(390.0, 844.0),
            Point::new(0.0, 47.0),
            ParallaxStyle::default(),
            PlaybackHandle::open("https://example.invalid/a.m3u8"),
        )
    }

    fn coordinator() -> TransitionCoordinator {
        TransitionCoordinator::new(SharedElementAnimator::default())
    }

    /// Collects every report a completion receives.
    fn recorder() -> (Rc<RefCell<Vec<TransitionReport>>>, impl Fn() -> Completion) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move || -> Completion {
                let log = Rc::clone(&log);
                Box::new(move |r: &TransitionReport| log.borrow_mut().push(*r))
            }
        };
        (log, make)
    }

    fn run_to_end(c: &mut TransitionCoordinator, s: &mut Stage) -> TransitionReport {
        for _ in 0..1000 {
            assert_eq!(s.owner(), HostId::TransitionLayer);
            if let Some(report) = c.tick(s, FRAME) {
                return report;
            }
        }
        panic!("transition never finished");
    }

    fn expand(c: &mut TransitionCoordinator, s: &mut Stage, done: Completion) -> Result<TransitionId, TransitionError> {
        s.prepare_fullscreen();
        let req = s.inline.expand_request(&s.surface);
        c.request_expand(s, req, done)
    }

    fn dismiss(c: &mut TransitionCoordinator, s: &mut Stage, done: Completion) -> Result<TransitionId, TransitionError> {
        let req = s.fullscreen.as_ref().map(|f| f.dismiss_request()).expect("fullscreen host");
        c.request_dismiss(s, req, done)
    }

    #[test]
    fn expand_lands_on_fullscreen_host() {
        let (log, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();

        assert_eq!(s.owner(), HostId::Inline);
        expand(&mut c, &mut s, done()).unwrap();
        assert_eq!(c.state(), TransitionState::Presenting);
        assert_eq!(s.owner(), HostId::TransitionLayer);
        assert_eq!(s.fullscreen.as_ref().map(|f| f.alpha()), Some(0.0));

        let report = run_to_end(&mut c, &mut s);
        assert!(report.success);
        assert_eq!(report.state, TransitionState::Presented);
        assert_eq!(report.owner, HostId::Fullscreen);
        assert_eq!(c.state(), TransitionState::Presented);
        assert_eq!(s.owner(), HostId::Fullscreen);
        assert_eq!(s.fullscreen.as_ref().map(|f| f.alpha()), Some(1.0));
        assert_eq!(s.surface.geometry().rotation, QUARTER_TURN);
        assert!(s
            .surface_frame_in(Space::Window)
            .approx_eq(&Frame::new(0.0, 0.0, 390.0, 844.0), 1e-9));
        assert_eq!(*log.borrow(), vec![report]);
    }

    #[test]
    fn expand_starts_from_the_shrunk_on_screen_rectangle() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        let h = s.inline.full_height();
        s.inline.on_scroll(-h * 0.25, h);
        let visible = s.inline.on_screen_frame();

        expand(&mut c, &mut s, done()).unwrap();
        assert!(s.surface_frame_in(Space::Window).approx_eq(&visible, 1e-9));
        assert!(s.surface.geometry().is_upright());
        let from = c.animation().map(|a| a.from().geometry.frame()).unwrap();
        assert!(from.approx_eq(&visible, 1e-9));
    }

    #[test]
    fn geometry_and_opacity_end_on_the_same_frame() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        let to = *c.animation().unwrap().to();

        let mut ended_early = false;
        loop {
            let before_geometry = *s.surface.geometry();
            if c.tick(&mut s, FRAME).is_some() {
                break;
            }
            if *s.surface.geometry() == to.geometry && before_geometry == to.geometry {
                ended_early = true;
            }
        }
        assert!(!ended_early, "geometry settled before the animation finished");
        assert_eq!(*s.surface.geometry(), to.geometry);
        assert_eq!(s.fullscreen.as_ref().map(|f| f.alpha()), Some(1.0));
    }

    #[test]
    fn expand_while_presenting_is_rejected() {
        let (log, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        let first = expand(&mut c, &mut s, done()).unwrap();
        c.tick(&mut s, FRAME);
        let geometry = *s.surface.geometry();

        let err = expand(&mut c, &mut s, done()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidState {
                kind: TransitionKind::Present,
                state: TransitionState::Presenting,
            }
        );
        assert_eq!(c.state(), TransitionState::Presenting);
        assert_eq!(*s.surface.geometry(), geometry);

        let report = run_to_end(&mut c, &mut s);
        assert_eq!(report.id, first);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn dismiss_requires_presented() {
        let (log, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        s.prepare_fullscreen();
        let req = s.fullscreen.as_ref().unwrap().dismiss_request();
        let err = c.request_dismiss(&mut s, req, done()).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidState { kind: TransitionKind::Dismiss, state: TransitionState::Idle }));
        assert_eq!(s.owner(), HostId::Inline);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn missing_fullscreen_host_aborts_without_mutation() {
        let (log, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        let before = *s.surface.geometry();

        let req = s.inline.expand_request(&s.surface);
        let err = c.request_expand(&mut s, req, done()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::MissingParticipant {
                kind: TransitionKind::Present,
                participant: Participant::FullscreenHost,
            }
        );
        assert_eq!(c.state(), TransitionState::Idle);
        assert_eq!(s.owner(), HostId::Inline);
        assert_eq!(*s.surface.geometry(), before);
        assert_eq!(s.surface.transfers(), 0);
        assert!(!c.is_animating());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn surface_owned_elsewhere_aborts_expand() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        s.prepare_fullscreen().set_alpha(0.5);
        if let Some(fullscreen) = s.fullscreen.as_ref() {
            fullscreen.take_over(&mut s.surface);
        }
        let err = expand(&mut c, &mut s, done()).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::MissingParticipant {
                participant: Participant::Surface { expected: HostId::Inline, found: HostId::Fullscreen },
                ..
            }
        ));
        assert_eq!(c.state(), TransitionState::Idle);
        assert_eq!(s.fullscreen.as_ref().map(|f| f.alpha()), Some(0.5));
    }

    #[test]
    fn round_trip_returns_surface_to_current_inline_bounds() {
        let (log, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        let original = s.surface_frame_in(Space::Window);

        expand(&mut c, &mut s, done()).unwrap();
        run_to_end(&mut c, &mut s);

        // Scrolled and rotated while fullscreen.
        s.resize(Size::new(844.0, 390.0));
        let h = s.inline.full_height();
        s.inline.on_scroll(-h * 0.5, h);
        let live_target = s.inline.on_screen_frame();
        assert!(!live_target.approx_eq(&original, 1e-6));

        dismiss(&mut c, &mut s, done()).unwrap();
        assert_eq!(c.state(), TransitionState::Dismissing);
        assert_eq!(s.fullscreen.as_ref().map(|f| f.is_hidden()), Some(true));
        let to = c.animation().map(|a| a.to().geometry.frame()).unwrap();
        assert!(to.approx_eq(&live_target, 1e-9));

        let report = run_to_end(&mut c, &mut s);
        assert!(report.success);
        assert_eq!(report.state, TransitionState::Idle);
        assert_eq!(s.owner(), HostId::Inline);
        assert!(s.fullscreen.is_none());
        assert!(s.surface.geometry().is_upright());
        assert!(s.surface.frame().approx_eq(&s.inline.bounds(), 1e-9));
        assert!(s.surface_frame_in(Space::Window).approx_eq(&live_target, 1e-9));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn interrupted_present_rolls_back_inline() {
        let (log, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        for _ in 0..10 {
            c.tick(&mut s, FRAME);
        }

        let report = c.interrupt(&mut s).unwrap();
        assert!(!report.success);
        assert_eq!(report.state, TransitionState::Idle);
        assert_eq!(c.state(), TransitionState::Idle);
        assert_eq!(s.owner(), HostId::Inline);
        assert!(s.fullscreen.is_none());
        assert!(s.surface.frame().approx_eq(&s.inline.bounds(), 1e-9));
        assert_eq!(log.borrow().as_slice(), &[report]);

        // Nothing left to interrupt or tick.
        assert!(c.interrupt(&mut s).is_none());
        assert!(c.tick(&mut s, FRAME).is_none());
        // And a fresh expand is accepted.
        assert!(expand(&mut c, &mut s, done()).is_ok());
    }

    #[test]
    fn interrupted_dismiss_stays_presented() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        run_to_end(&mut c, &mut s);
        dismiss(&mut c, &mut s, done()).unwrap();
        c.tick(&mut s, FRAME);

        let report = c.interrupt(&mut s).unwrap();
        assert!(!report.success);
        assert_eq!(report.state, TransitionState::Presented);
        assert_eq!(s.owner(), HostId::Fullscreen);
        let fullscreen = s.fullscreen.as_ref().unwrap();
        assert!(!fullscreen.is_hidden());
        assert_eq!(*s.surface.geometry(), fullscreen.rotated_layout());
    }

    #[test]
    fn resize_mid_present_keeps_target_and_lands_on_live_layout() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        for _ in 0..5 {
            c.tick(&mut s, FRAME);
        }
        let to = *c.animation().unwrap().to();
        let in_flight = *s.surface.geometry();

        s.resize(Size::new(844.0, 390.0));
        assert_eq!(*c.animation().unwrap().to(), to);
        assert_eq!(*s.surface.geometry(), in_flight);
        assert_eq!(s.owner(), HostId::TransitionLayer);

        let report = run_to_end(&mut c, &mut s);
        assert!(report.success);
        assert_eq!(report.state, TransitionState::Presented);
        assert_eq!(s.owner(), HostId::Fullscreen);
        let live = s.fullscreen.as_ref().map(|f| f.rotated_layout()).unwrap();
        assert_eq!(*s.surface.geometry(), live);
        assert_eq!(live.center, Point::new(422.0, 195.0));
        assert_eq!(live.size, Size::new(390.0, 844.0));
        assert_eq!(live.rotation, QUARTER_TURN);
        assert_ne!(live, to.geometry);
    }

    #[test]
    fn resize_mid_dismiss_keeps_target_and_lands_on_live_bounds() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        run_to_end(&mut c, &mut s);
        dismiss(&mut c, &mut s, done()).unwrap();
        for _ in 0..5 {
            c.tick(&mut s, FRAME);
        }
        let to = *c.animation().unwrap().to();

        s.resize(Size::new(844.0, 390.0));
        assert_eq!(*c.animation().unwrap().to(), to);
        assert_eq!(s.owner(), HostId::TransitionLayer);

        let report = run_to_end(&mut c, &mut s);
        assert!(report.success);
        assert_eq!(report.state, TransitionState::Idle);
        assert_eq!(s.owner(), HostId::Inline);
        assert!(s.fullscreen.is_none());
        assert!(s.surface.frame().approx_eq(&s.inline.bounds(), 1e-9));
        assert!(s.surface.frame().approx_eq(&Frame::new(0.0, 0.0, 844.0, 474.75), 1e-9));
        assert!(!s.surface_frame_in(Space::Window).approx_eq(&to.geometry.frame(), 1e-6));
    }

    #[test]
    fn destination_removed_mid_flight_still_lands_on_a_host() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        c.tick(&mut s, FRAME);
        s.fullscreen = None;

        let report = run_to_end(&mut c, &mut s);
        assert_eq!(report.state, TransitionState::Idle);
        assert_eq!(report.owner, HostId::Inline);
        assert_eq!(c.state(), TransitionState::Idle);
    }

    #[test]
    fn scrolling_mid_flight_never_moves_the_surface() {
        let (_, done) = recorder();
        let mut s = stage();
        let mut c = coordinator();
        expand(&mut c, &mut s, done()).unwrap();
        c.tick(&mut s, FRAME);
        let g = *s.surface.geometry();
        let h = s.inline.full_height();
        s.inline.on_scroll(0.0, h);
        assert_eq!(*s.surface.geometry(), g);
        assert_eq!(s.owner(), HostId::TransitionLayer);
    }
}
