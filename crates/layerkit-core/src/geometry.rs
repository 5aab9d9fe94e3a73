#![forbid(unsafe_code)]

//! Geometric primitives in stage pixels.
//!
//! All values are `f64` because frame geometry is the product of scale
//! factors and fractional scroll offsets; rounding is left to the host
//! surface.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A point (or displacement) in stage pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Manhattan length, used for gesture distance thresholds.
    #[inline]
    pub fn manhattan(&self) -> f64 {
        self.x.abs() + self.y.abs()
    }

    /// Component-wise sum.
    #[inline]
    pub fn offset(&self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    /// Linear interpolation towards `to` by `t` in [0, 1].
    #[inline]
    pub fn lerp(&self, to: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

/// A width/height pair in stage pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Multiply both dimensions by `factor`.
    #[inline]
    pub fn scaled(&self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

bitflags! {
    /// Axes along which a frame can scroll.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Axes: u8 {
        const X = 0b01;
        const Y = 0b10;
    }
}

/// Clamp `value` into `[0, max]`, treating a negative `max` as zero.
#[inline]
pub fn clamp_extent(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max.max(0.0))
}
