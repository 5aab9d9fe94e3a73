#![forbid(unsafe_code)]

//! Time-based animation primitives for frame hand-offs.
//!
//! Animations are advanced explicitly with [`Animation::tick`]; nothing here
//! reads a clock. Layouts own their animations and tick them from the layer's
//! frame loop, which keeps hand-offs deterministic under a
//! [`DeterministicClock`](crate::clock::DeterministicClock).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out, close to the CSS `ease` keyword.
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Named timing functions accepted in transition descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timing {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Timing {
    /// The easing function implementing this timing.
    pub fn easing(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::Ease => ease_out_cubic,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
        }
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased output, clamped to [0.0, 1.0].
    fn value(&self) -> f64;

    /// Jump straight to the end state.
    fn finish(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Elapsed time is tracked as a [`Duration`] so repeated small ticks do not
/// accumulate floating-point drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and linear easing.
    ///
    /// A zero duration completes on the first tick.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Time left until completion.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        (self.easing)(self.raw_progress())
    }

    fn finish(&mut self) {
        self.elapsed = self.duration;
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    /// Interpolate from `self` to `to` by `t` in [0, 1].
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t.clamp(0.0, 1.0)
    }
}

impl Lerp for Point {
    #[inline]
    fn lerp(self, to: Self, t: f64) -> Self {
        Point::lerp(&self, to, t)
    }
}

/// Interpolates a value between `from` and `to` over a [`Fade`].
///
/// [`Animation::value`] returns the eased progress; use [`Tween::current`]
/// for the interpolated value.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T> {
    from: T,
    to: T,
    clock: Fade,
}

impl<T: Lerp> Tween<T> {
    /// Create a tween from `from` to `to` over `duration` (ease-out by default).
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            clock: Fade::new(duration).easing(ease_out),
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.clock = self.clock.easing(easing);
        self
    }

    /// Current interpolated value.
    pub fn current(&self) -> T {
        self.from.lerp(self.to, self.clock.value())
    }

    /// Target value.
    pub fn target(&self) -> T {
        self.to
    }
}

impl<T: Lerp> Animation for Tween<T> {
    fn tick(&mut self, dt: Duration) {
        self.clock.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.clock.is_complete()
    }

    fn value(&self) -> f64 {
        self.clock.value()
    }

    fn finish(&mut self) {
        self.clock.finish();
    }
}
