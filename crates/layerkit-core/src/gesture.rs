#![forbid(unsafe_code)]

//! Normalized gesture samples.
//!
//! Raw pointer, touch, and wheel capture happens in the host. The host feeds
//! positions into a [`GestureTracker`], which emits one [`Gesture`] per input
//! sample. A gesture's direction is the direction the pointer travels: a
//! finger moving up produces [`Direction::Up`] and reveals content below.
//!
//! # Invariants
//!
//! 1. Every drag produces exactly one sample with `first == true`, followed by
//!    zero or more move samples, and at most one sample with `last == true`.
//! 2. Once a drag's direction is decided it does not change until the drag
//!    ends.
//! 3. Wheel samples never set `first`/`last`; their shift accumulates until
//!    [`GestureTracker::reset_wheel`].

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Default distance (stage pixels) a gesture must travel before it counts as
/// directional.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 10.0;

/// Direction of pointer travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Classify a displacement by its dominant axis. Ties favour the vertical
    /// axis; a zero displacement has no direction.
    pub fn from_shift(shift: Point) -> Option<Self> {
        if shift.x == 0.0 && shift.y == 0.0 {
            return None;
        }
        if shift.x.abs() > shift.y.abs() {
            Some(if shift.x < 0.0 { Self::Left } else { Self::Right })
        } else {
            Some(if shift.y < 0.0 { Self::Up } else { Self::Down })
        }
    }

    /// Whether the direction runs along the horizontal axis.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// One normalized gesture sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Dominant direction, once the gesture has travelled far enough.
    pub direction: Option<Direction>,
    /// First sample of a drag.
    pub first: bool,
    /// Terminal sample of a drag.
    pub last: bool,
    /// Sample produced by a scroll wheel.
    pub wheel: bool,
    /// Accumulated movement since the first sample.
    pub shift: Point,
    /// Movement since the previous sample.
    pub delta: Point,
    /// Set by handlers that consumed the sample; the host should then
    /// suppress the platform default.
    pub prevent_default: bool,
    distance_threshold: f64,
}

impl Gesture {
    /// A bare sample with the given movement, used by hosts that normalize
    /// input themselves.
    pub fn new(shift: Point, delta: Point) -> Self {
        Self {
            direction: None,
            first: false,
            last: false,
            wheel: false,
            shift,
            delta,
            prevent_default: false,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        }
    }

    /// Set the direction (builder).
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Mark as the first sample (builder).
    #[must_use]
    pub fn first(mut self) -> Self {
        self.first = true;
        self
    }

    /// Mark as the terminal sample (builder).
    #[must_use]
    pub fn last(mut self) -> Self {
        self.last = true;
        self
    }

    /// Mark as a wheel sample (builder).
    #[must_use]
    pub fn wheel(mut self) -> Self {
        self.wheel = true;
        self
    }

    /// Override the distance threshold used by [`enough_distance`](Self::enough_distance).
    #[must_use]
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Replace the distance threshold in place.
    pub fn set_distance_threshold(&mut self, threshold: f64) {
        self.distance_threshold = threshold;
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    /// Whether the gesture has travelled beyond its distance threshold.
    pub fn enough_distance(&self) -> bool {
        self.shift.manhattan() > self.distance_threshold
    }
}

/// Builds [`Gesture`] samples from raw pointer and wheel input.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold: f64,
    origin: Option<Point>,
    previous: Point,
    direction: Option<Direction>,
    wheel_shift: Point,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DISTANCE_THRESHOLD)
    }
}

impl GestureTracker {
    /// Create a tracker that decides direction after `threshold` pixels.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            origin: None,
            previous: Point::ZERO,
            direction: None,
            wheel_shift: Point::ZERO,
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Pointer pressed at `at`.
    pub fn begin(&mut self, at: Point) -> Gesture {
        self.origin = Some(at);
        self.previous = at;
        self.direction = None;
        self.sample(at).first()
    }

    /// Pointer moved to `at`. Returns `None` if no drag is in progress.
    pub fn move_to(&mut self, at: Point) -> Option<Gesture> {
        self.origin?;
        Some(self.sample(at))
    }

    /// Pointer released at `at`. Returns `None` if no drag is in progress.
    pub fn end(&mut self, at: Point) -> Option<Gesture> {
        self.origin?;
        let gesture = self.sample(at).last();
        self.origin = None;
        Some(gesture)
    }

    /// Wheel scrolled by `delta` (positive y scrolls content down).
    ///
    /// Wheel deltas are converted to pointer-travel coordinates, so scrolling
    /// down reads as an upward swipe.
    pub fn wheel(&mut self, delta: Point) -> Gesture {
        let travel = Point::new(-delta.x, -delta.y);
        self.wheel_shift = self.wheel_shift.offset(travel);
        let mut gesture = Gesture::new(self.wheel_shift, travel)
            .with_distance_threshold(self.threshold)
            .wheel();
        gesture.direction = Direction::from_shift(self.wheel_shift);
        gesture
    }

    /// Forget accumulated wheel movement (call when a wheel burst ends).
    pub fn reset_wheel(&mut self) {
        self.wheel_shift = Point::ZERO;
    }

    fn sample(&mut self, at: Point) -> Gesture {
        let origin = self.origin.unwrap_or(at);
        let shift = Point::new(at.x - origin.x, at.y - origin.y);
        let delta = Point::new(at.x - self.previous.x, at.y - self.previous.y);
        self.previous = at;
        if self.direction.is_none() && shift.manhattan() > self.threshold {
            self.direction = Direction::from_shift(shift);
        }
        let mut gesture = Gesture::new(shift, delta).with_distance_threshold(self.threshold);
        gesture.direction = self.direction;
        gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_from_dominant_axis() {
        assert_eq!(Direction::from_shift(Point::new(-20.0, 5.0)), Some(Direction::Left));
        assert_eq!(Direction::from_shift(Point::new(3.0, 30.0)), Some(Direction::Down));
        assert_eq!(Direction::from_shift(Point::new(10.0, -10.0)), Some(Direction::Up));
        assert_eq!(Direction::from_shift(Point::ZERO), None);
    }

    #[test]
    fn drag_decides_direction_after_threshold() {
        let mut tracker = GestureTracker::new(10.0);
        let first = tracker.begin(Point::new(100.0, 100.0));
        assert!(first.first);
        assert_eq!(first.direction, None);

        let small = tracker.move_to(Point::new(95.0, 100.0)).unwrap();
        assert_eq!(small.direction, None);
        assert!(!small.enough_distance());

        let far = tracker.move_to(Point::new(60.0, 100.0)).unwrap();
        assert_eq!(far.direction, Some(Direction::Left));
        assert_eq!(far.delta, Point::new(-35.0, 0.0));
        assert!(far.enough_distance());

        // Direction stays locked even if the pointer swings vertically.
        let swing = tracker.move_to(Point::new(60.0, 200.0)).unwrap();
        assert_eq!(swing.direction, Some(Direction::Left));

        let last = tracker.end(Point::new(60.0, 200.0)).unwrap();
        assert!(last.last);
        assert!(!tracker.is_dragging());
        assert!(tracker.move_to(Point::ZERO).is_none());
    }

    #[test]
    fn wheel_accumulates_until_reset() {
        let mut tracker = GestureTracker::new(10.0);
        let g = tracker.wheel(Point::new(0.0, 6.0));
        assert!(g.wheel);
        assert_eq!(g.direction, Some(Direction::Up));
        assert!(!g.enough_distance());
        let g = tracker.wheel(Point::new(0.0, 6.0));
        assert!(g.enough_distance());
        tracker.reset_wheel();
        let g = tracker.wheel(Point::new(0.0, 1.0));
        assert!(!g.enough_distance());
    }
}
