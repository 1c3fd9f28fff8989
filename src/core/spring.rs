//! Spring-damped timing curve driving every transition.
//!
//! The curve is the analytical solution of a damped harmonic oscillator
//! pulled from 0 toward 1:
//!
//! ```text
//! x''(t) + 2ζω₀·x'(t) + ω₀²·x(t) = ω₀²,   x(0) = 0,   x'(0) = v₀
//! ```
//!
//! ω₀ is derived from the requested duration so the oscillation envelope has
//! decayed below [`SETTLE_RESIDUAL`] when the duration elapses.  At that
//! instant the animation snaps to exactly 1 and reports finished, so every
//! property driven by the same sample lands on its end value together.

use std::time::Duration;

/// Envelope amplitude left at `duration`.
const SETTLE_RESIDUAL: f64 = 0.002;

/// Timing parameters for a spring animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTiming {
    pub duration: Duration,
    /// ζ; below 1 overshoots, 1 is critical, above 1 creeps.
    pub damping_ratio: f64,
    /// Initial velocity in progress units per second.
    pub initial_velocity: f64,
}

impl Default for SpringTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            damping_ratio: 0.85,
            initial_velocity: 0.0,
        }
    }
}

impl SpringTiming {
    /// Natural frequency ω₀ for this duration and damping.
    fn omega(&self) -> f64 {
        let secs = self.duration.as_secs_f64().max(0.01);
        let zeta = self.damping_ratio.max(0.01);
        // Decay rate of the slowest mode: ζω₀ when underdamped,
        // ω₀(ζ - √(ζ²-1)) when overdamped.
        let rate_per_omega = if zeta <= 1.0 {
            zeta
        } else {
            zeta - (zeta * zeta - 1.0).sqrt()
        };
        (1.0 / SETTLE_RESIDUAL).ln() / (rate_per_omega * secs)
    }

    /// Curve value at `t` seconds, without the end-of-duration snap.
    pub fn position(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let w = self.omega();
        let zeta = self.damping_ratio.max(0.01);
        let v0 = self.initial_velocity;

        if (zeta - 1.0).abs() < 1e-3 {
            // Critically damped.
            let decay = (-w * t).exp();
            return 1.0 - decay * (1.0 + (w - v0) * t);
        }
        if zeta < 1.0 {
            let wd = w * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * w * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            return 1.0 - decay * (cos + (zeta * w - v0) / wd * sin);
        }
        // Overdamped: two real roots.
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w * (zeta - root);
        let r2 = -w * (zeta + root);
        let c1 = (-v0 - r2) / (r1 - r2);
        let c2 = 1.0 - c1;
        1.0 - (c1 * (r1 * t).exp() + c2 * (r2 * t).exp())
    }
}

/// One sample of a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSample {
    /// Raw curve value; may overshoot 1 when underdamped.
    pub progress: f64,
    pub finished: bool,
}

impl SpringSample {
    /// Progress clamped to `[0, 1]`, for properties that must not overshoot
    /// (opacity).
    pub fn clamped(&self) -> f64 {
        self.progress.clamp(0.0, 1.0)
    }
}

/// A running spring, advanced by whoever owns the frame clock.
#[derive(Debug, Clone)]
pub struct SpringAnimation {
    timing: SpringTiming,
    elapsed: Duration,
}

impl SpringAnimation {
    pub fn new(timing: SpringTiming) -> Self {
        Self {
            timing,
            elapsed: Duration::ZERO,
        }
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance by `dt` and sample.
    pub fn advance(&mut self, dt: Duration) -> SpringSample {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.timing.duration);
        self.sample()
    }

    pub fn sample(&self) -> SpringSample {
        if self.elapsed >= self.timing.duration {
            return SpringSample {
                progress: 1.0,
                finished: true,
            };
        }
        SpringSample {
            progress: self.timing.position(self.elapsed.as_secs_f64()),
            finished: false,
        }
    }
}
