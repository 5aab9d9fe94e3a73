#![forbid(unsafe_code)]

//! Scroll transforms.
//!
//! A [`ScrollTransformer`] folds requested scroll offsets into a
//! [`Transform`], and interprets live gesture samples as scroll motion.
//!
//! Two backings exist:
//!
//! - **Native**: the platform scroll primitive moves the content. Resting
//!   transforms carry no scroll translation; the transformer records the
//!   native offset the host must apply. Intermediate transforms (used while a
//!   hand-off animates) leave the native offset untouched and compensate for
//!   the difference with a translation instead.
//! - **Manual**: the scroll offset is applied as a translation of the layer.
//!
//! # Invariants
//!
//! 1. Scroll offsets are always clamped to `[0, max_scroll]` on scrollable
//!    axes and forced to `0` on the others.
//! 2. A gesture pushing against the edge it is already resting on is never
//!    reported as scroll motion, so it can become a frame transition.

use std::fmt;

use layerkit_core::geometry::{Point, clamp_extent};
use layerkit_core::gesture::{Direction, Gesture};

use crate::frame::TransformData;
use crate::transform::Transform;

/// Offsets within this distance of an edge count as resting on it.
const EDGE_EPSILON: f64 = 0.5;

/// How a gesture sample should be handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollResponse {
    /// The platform can scroll this unassisted.
    Native,
    /// Apply this transform to the layer immediately.
    Manual(Transform),
    /// Not scroll motion; evaluate as a candidate frame transition.
    NotScroll,
}

/// Composes gesture deltas and frame geometry into transforms.
pub trait ScrollTransformer: fmt::Debug {
    /// Transform showing `tfd` scrolled to (`scroll_x`, `scroll_y`).
    ///
    /// With `intermediate`, the current native scroll offset is preserved and
    /// compensated for.
    fn scroll_transform(
        &mut self,
        tfd: &TransformData,
        scroll_x: f64,
        scroll_y: f64,
        intermediate: bool,
    ) -> Transform;

    /// Interpret one gesture sample against the current frame geometry and
    /// the currently applied transform.
    fn scroll_gesture(
        &mut self,
        gesture: &Gesture,
        tfd: &TransformData,
        current: &Transform,
    ) -> ScrollResponse;

    /// Whether the platform scroll primitive backs this transformer.
    fn is_native(&self) -> bool;

    /// Native scroll offset the host should apply (zero when manual).
    fn native_scroll(&self) -> Point;

    /// Record a native scroll offset reported by the host.
    fn set_native_scroll(&mut self, at: Point);
}

/// Default transformer supporting both native and manual backings.
#[derive(Debug, Clone)]
pub struct DefaultScrollTransformer {
    native: bool,
    native_offset: Point,
}

impl DefaultScrollTransformer {
    /// Create a transformer with the given backing.
    pub fn new(native: bool) -> Self {
        Self {
            native,
            native_offset: Point::ZERO,
        }
    }

    /// A transformer that always translates manually.
    pub fn manual() -> Self {
        Self::new(false)
    }

    fn clamp(tfd: &TransformData, scroll_x: f64, scroll_y: f64) -> Point {
        Point::new(
            if tfd.is_scroll_x() { clamp_extent(scroll_x, tfd.max_scroll_x) } else { 0.0 },
            if tfd.is_scroll_y() { clamp_extent(scroll_y, tfd.max_scroll_y) } else { 0.0 },
        )
    }

    /// Whether content at `offset` can still move for a gesture in `direction`.
    fn can_scroll(direction: Direction, offset: Point, tfd: &TransformData) -> bool {
        match direction {
            Direction::Up => tfd.is_scroll_y() && offset.y < tfd.max_scroll_y - EDGE_EPSILON,
            Direction::Down => tfd.is_scroll_y() && offset.y > EDGE_EPSILON,
            Direction::Left => tfd.is_scroll_x() && offset.x < tfd.max_scroll_x - EDGE_EPSILON,
            Direction::Right => tfd.is_scroll_x() && offset.x > EDGE_EPSILON,
        }
    }
}

impl ScrollTransformer for DefaultScrollTransformer {
    fn scroll_transform(
        &mut self,
        tfd: &TransformData,
        scroll_x: f64,
        scroll_y: f64,
        intermediate: bool,
    ) -> Transform {
        let target = Self::clamp(tfd, scroll_x, scroll_y);
        let (shift_x, shift_y) = if !self.native {
            (-target.x, -target.y)
        } else if intermediate {
            (
                self.native_offset.x - target.x,
                self.native_offset.y - target.y,
            )
        } else {
            self.native_offset = target;
            (0.0, 0.0)
        };
        Transform {
            scale: tfd.scale,
            shift_x,
            shift_y,
            scroll_x: target.x,
            scroll_y: target.y,
            is_scroll_x: tfd.is_scroll_x(),
            is_scroll_y: tfd.is_scroll_y(),
        }
    }

    fn scroll_gesture(
        &mut self,
        gesture: &Gesture,
        tfd: &TransformData,
        current: &Transform,
    ) -> ScrollResponse {
        if self.native {
            let movable = match gesture.direction {
                Some(direction) => Self::can_scroll(direction, self.native_offset, tfd),
                None => !tfd.scroll_axes.is_empty(),
            };
            return if movable {
                ScrollResponse::Native
            } else {
                ScrollResponse::NotScroll
            };
        }

        let offset = current.scroll();
        let movable = match gesture.direction {
            Some(direction) => Self::can_scroll(direction, offset, tfd),
            None => !tfd.scroll_axes.is_empty(),
        };
        if !movable {
            return ScrollResponse::NotScroll;
        }
        // Pointer travel moves content with the finger: scrolling goes the
        // opposite way.
        let transform = self.scroll_transform(
            tfd,
            offset.x - gesture.delta.x,
            offset.y - gesture.delta.y,
            false,
        );
        ScrollResponse::Manual(transform)
    }

    fn is_native(&self) -> bool {
        self.native
    }

    fn native_scroll(&self) -> Point {
        if self.native { self.native_offset } else { Point::ZERO }
    }

    fn set_native_scroll(&mut self, at: Point) {
        self.native_offset = at;
    }
}
