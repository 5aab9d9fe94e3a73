#![forbid(unsafe_code)]

//! The renderable layer transform.

use layerkit_core::geometry::Point;

/// How the layer (or the frame inside it) must be positioned.
///
/// `shift_x`/`shift_y` is the translation applied to the layer content.
/// `scroll_x`/`scroll_y` is the scroll offset the transform represents; under
/// native scrolling the platform applies it, otherwise it is already folded
/// into the shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub shift_x: f64,
    pub shift_y: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub is_scroll_x: bool,
    pub is_scroll_y: bool,
}

impl Transform {
    /// No scale, no shift, no scroll.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        shift_x: 0.0,
        shift_y: 0.0,
        scroll_x: 0.0,
        scroll_y: 0.0,
        is_scroll_x: false,
        is_scroll_y: false,
    };

    /// Translation applied to the layer content.
    #[inline]
    pub fn translation(&self) -> Point {
        Point::new(self.shift_x, self.shift_y)
    }

    /// Scroll offset represented by this transform.
    #[inline]
    pub fn scroll(&self) -> Point {
        Point::new(self.scroll_x, self.scroll_y)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
