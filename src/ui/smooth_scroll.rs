//! Point-level smooth scroll with exponential ease-out.
//!
//! Input moves a target distance; each tick the displayed distance closes a
//! fixed fraction of the gap, so wheel notches and page jumps decelerate
//! visibly.  The displayed value is what feeds `InlineHost::on_scroll`.

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Distance scrolled past the top, as displayed.
    current: f64,
    target: f64,
    /// Upper bound for both values.
    max: f64,
    /// Damping: `gap *= (1 - speed)` each tick.
    speed: f64,
}

/// Gaps below this many points snap shut.
const SETTLE: f64 = 0.5;

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            max: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Move the target by `delta` points, staying within `[0, max]`.
    pub fn scroll_by(&mut self, delta: f64) {
        self.target = (self.target + delta).clamp(0.0, self.max);
    }

    /// New content extent.  Both values are pulled back inside it.
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.target = self.target.min(self.max);
        self.current = self.current.min(self.max);
    }

    /// Close part of the gap.  Returns `true` while still moving.
    pub fn tick(&mut self) -> bool {
        let gap = self.target - self.current;
        if gap.abs() < SETTLE {
            self.current = self.target;
            return false;
        }
        self.current += gap * self.speed;
        true
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[cfg(test)]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `(offset, inset_top)` in scroll-view terms: the offset starts at
    /// `-inset_top` when nothing has been scrolled.
    pub fn scroll_sample(&self, inset_top: f64) -> (f64, f64) {
        (self.current - inset_top, inset_top)
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.current != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_on_the_target() {
        let mut s = SmoothScroll::new(0.35);
        s.set_max(1000.0);
        s.scroll_by(200.0);
        let first = {
            s.tick();
            s.current()
        };
        assert!((first - 70.0).abs() < 1e-9);
        let mut ticks = 1;
        while s.tick() {
            ticks += 1;
            assert!(s.current() <= 200.0);
        }
        assert_eq!(s.current(), 200.0);
        assert!(!s.is_animating());
        assert!(ticks < 30);
    }

    #[test]
    fn target_stays_in_range() {
        let mut s = SmoothScroll::new(0.5);
        s.set_max(100.0);
        s.scroll_by(-50.0);
        assert_eq!(s.target(), 0.0);
        s.scroll_by(500.0);
        assert_eq!(s.target(), 100.0);
        s.set_max(40.0);
        assert_eq!(s.target(), 40.0);
    }

    #[test]
    fn sample_uses_negative_inset_offset() {
        let mut s = SmoothScroll::new(0.5);
        s.set_max(500.0);
        assert_eq!(s.scroll_sample(180.0), (-180.0, 180.0));
        s.scroll_by(90.0);
        while s.tick() {}
        assert_eq!(s.scroll_sample(180.0), (-90.0, 180.0));
    }
}
