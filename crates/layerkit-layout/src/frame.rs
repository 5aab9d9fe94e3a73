#![forbid(unsafe_code)]

//! Frame declarations and layout geometry.
//!
//! A [`Frame`] is declared by the host tree (name, neighbors, natural size,
//! fit mode). Given the stage size it computes [`TransformData`]: the scale,
//! scaled size, centring shift, and scroll extents the layer needs to show
//! it.

use serde::{Deserialize, Serialize};

use layerkit_core::geometry::{Axes, Point, Size};
use layerkit_core::gesture::Direction;

use crate::transition::TransitionType;

/// Extents below this are treated as "fits exactly".
const SCROLL_EPSILON: f64 = 0.5;

/// One side of a frame's neighbor map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl NeighborSide {
    /// Neighbor revealed by a gesture travelling in `direction`.
    ///
    /// Swiping up uncovers what lies below, swiping left what lies to the right.
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Bottom,
            Direction::Down => Self::Top,
            Direction::Left => Self::Right,
            Direction::Right => Self::Left,
        }
    }

    /// Transition type that visually moves towards this neighbor.
    pub const fn transition_type(self) -> TransitionType {
        match self {
            Self::Left => TransitionType::Right,
            Self::Right => TransitionType::Left,
            Self::Top => TransitionType::Down,
            Self::Bottom => TransitionType::Up,
        }
    }
}

/// Named neighbors of a frame (`l`, `r`, `t`, `b`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Neighbors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
}

impl Neighbors {
    /// Neighbor name on `side`, if declared.
    pub fn get(&self, side: NeighborSide) -> Option<&str> {
        match side {
            NeighborSide::Left => self.l.as_deref(),
            NeighborSide::Right => self.r.as_deref(),
            NeighborSide::Top => self.t.as_deref(),
            NeighborSide::Bottom => self.b.as_deref(),
        }
    }

    /// Set the neighbor on `side` (builder).
    #[must_use]
    pub fn with(mut self, side: NeighborSide, name: impl Into<String>) -> Self {
        let slot = match side {
            NeighborSide::Left => &mut self.l,
            NeighborSide::Right => &mut self.r,
            NeighborSide::Top => &mut self.t,
            NeighborSide::Bottom => &mut self.b,
        };
        *slot = Some(name.into());
        self
    }

    /// Whether no side is declared.
    pub fn is_empty(&self) -> bool {
        self.l.is_none() && self.r.is_none() && self.t.is_none() && self.b.is_none()
    }
}

/// How a frame is fitted into the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitTo {
    /// Scale so the frame width matches the stage; scrolls vertically.
    #[default]
    Width,
    /// Scale so the frame height matches the stage; scrolls horizontally.
    Height,
    /// Natural size; scrolls on any overflowing axis.
    Fixed,
    /// Largest scale that keeps the whole frame visible.
    Contain,
    /// Smallest scale that covers the stage; scrolls on the overflowing axis.
    Cover,
    /// Frame takes the stage size.
    Responsive,
    /// Frame takes the stage width and keeps its height.
    ResponsiveWidth,
    /// Frame takes the stage height and keeps its width.
    ResponsiveHeight,
}

/// Where a frame's scroll position starts when it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    #[serde(alias = "center")]
    Middle,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl StartPosition {
    /// Initial scroll offset for the given extents.
    pub fn initial_scroll(self, max_x: f64, max_y: f64) -> Point {
        match self {
            Self::Top | Self::Left | Self::TopLeft => Point::ZERO,
            Self::Bottom | Self::BottomLeft => Point::new(0.0, max_y),
            Self::Right | Self::TopRight => Point::new(max_x, 0.0),
            Self::BottomRight => Point::new(max_x, max_y),
            Self::Middle => Point::new(max_x / 2.0, max_y / 2.0),
        }
    }
}

/// A frame declaration supplied by the host tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub name: String,
    #[serde(default)]
    pub neighbors: Neighbors,
    pub width: f64,
    pub height: f64,
    /// Canvas position (used by the canvas layout).
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub fit_to: FitTo,
    #[serde(default)]
    pub start_position: StartPosition,
    #[serde(default)]
    pub no_scrolling: bool,
}

impl Frame {
    /// Declare a frame with a natural size.
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            neighbors: Neighbors::default(),
            width: size.width,
            height: size.height,
            x: 0.0,
            y: 0.0,
            fit_to: FitTo::default(),
            start_position: StartPosition::default(),
            no_scrolling: false,
        }
    }

    #[must_use]
    pub fn with_neighbors(mut self, neighbors: Neighbors) -> Self {
        self.neighbors = neighbors;
        self
    }

    #[must_use]
    pub fn with_fit_to(mut self, fit_to: FitTo) -> Self {
        self.fit_to = fit_to;
        self
    }

    #[must_use]
    pub fn with_start_position(mut self, start: StartPosition) -> Self {
        self.start_position = start;
        self
    }

    /// Place the frame on the canvas (builder).
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn without_scrolling(mut self) -> Self {
        self.no_scrolling = true;
        self
    }

    /// Natural size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Compute display geometry for `stage`.
    ///
    /// `start` overrides the frame's declared start position.
    pub fn transform_data(&self, stage: Size, start: Option<StartPosition>) -> TransformData {
        let (mut width, mut height) = (self.width, self.height);
        let ratio = |stage_len: f64, len: f64| {
            if len > 0.0 { stage_len / len } else { 1.0 }
        };
        let scale = match self.fit_to {
            FitTo::Width => ratio(stage.width, width),
            FitTo::Height => ratio(stage.height, height),
            FitTo::Fixed => 1.0,
            FitTo::Contain => ratio(stage.width, width).min(ratio(stage.height, height)),
            FitTo::Cover => ratio(stage.width, width).max(ratio(stage.height, height)),
            FitTo::Responsive => {
                width = stage.width;
                height = stage.height;
                1.0
            }
            FitTo::ResponsiveWidth => {
                width = stage.width;
                1.0
            }
            FitTo::ResponsiveHeight => {
                height = stage.height;
                1.0
            }
        };
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let start = start.unwrap_or(self.start_position);
        TransformData::compute(
            stage,
            Size::new(width, height),
            scale,
            Point::new(self.x, self.y),
            start,
            self.no_scrolling,
        )
    }
}

/// Layout-computed geometry for one frame on one stage.
///
/// Scroll values are in stage pixels (after scaling).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformData {
    /// Stage the geometry was computed for.
    pub stage: Size,
    pub scale: f64,
    /// Frame size before scaling (after responsive adjustment).
    pub width: f64,
    pub height: f64,
    /// Frame size after scaling.
    pub frame_width: f64,
    pub frame_height: f64,
    /// Canvas position of the frame.
    pub position: Point,
    /// Centring offset when the scaled frame is smaller than the stage.
    pub shift_x: f64,
    pub shift_y: f64,
    pub max_scroll_x: f64,
    pub max_scroll_y: f64,
    pub scroll_axes: Axes,
    pub start_position: StartPosition,
    /// Scroll offset implied by `start_position`.
    pub initial_scroll: Point,
}

impl TransformData {
    fn compute(
        stage: Size,
        natural: Size,
        scale: f64,
        position: Point,
        start: StartPosition,
        no_scrolling: bool,
    ) -> Self {
        let frame = natural.scaled(scale);
        let max_x = (frame.width - stage.width).max(0.0);
        let max_y = (frame.height - stage.height).max(0.0);
        let mut axes = Axes::empty();
        if !no_scrolling && max_x > SCROLL_EPSILON {
            axes |= Axes::X;
        }
        if !no_scrolling && max_y > SCROLL_EPSILON {
            axes |= Axes::Y;
        }
        let initial = start.initial_scroll(max_x, max_y);
        Self {
            stage,
            scale,
            width: natural.width,
            height: natural.height,
            frame_width: frame.width,
            frame_height: frame.height,
            position,
            shift_x: ((stage.width - frame.width) / 2.0).max(0.0),
            shift_y: ((stage.height - frame.height) / 2.0).max(0.0),
            max_scroll_x: max_x,
            max_scroll_y: max_y,
            scroll_axes: axes,
            start_position: start,
            initial_scroll: Point::new(
                if axes.contains(Axes::X) { initial.x } else { 0.0 },
                if axes.contains(Axes::Y) { initial.y } else { 0.0 },
            ),
        }
    }

    /// Geometry of the empty state: the stage itself, unscaled, unscrollable.
    pub fn empty(stage: Size, start: Option<StartPosition>) -> Self {
        Self::compute(
            stage,
            stage,
            1.0,
            Point::ZERO,
            start.unwrap_or_default(),
            true,
        )
    }

    #[inline]
    pub fn is_scroll_x(&self) -> bool {
        self.scroll_axes.contains(Axes::X)
    }

    #[inline]
    pub fn is_scroll_y(&self) -> bool {
        self.scroll_axes.contains(Axes::Y)
    }
}
