#![forbid(unsafe_code)]

//! layerkit public facade crate.
//!
//! Re-exports the types most hosts need from the internal crates and offers
//! a prelude for day-to-day use.
//!
//! ```
//! use layerkit::prelude::*;
//!
//! # fn main() -> layerkit::Result<()> {
//! let clock = DeterministicClock::new();
//! let stage = Size::new(1024.0, 768.0);
//! let frames = vec![Frame::new("intro", stage)];
//! let mut layer = Layer::new(LayerConfig::default(), frames, Box::new(clock));
//! layer.attach(stage)?;
//! layer.tick();
//! assert_eq!(layer.current_frame().map(|f| f.name.as_str()), Some("intro"));
//! # Ok(())
//! # }
//! ```

// --- Core re-exports -------------------------------------------------------

pub use layerkit_core::animation::Timing;
pub use layerkit_core::clock::{Clock, DeterministicClock, SystemClock};
pub use layerkit_core::geometry::{Point, Size};
pub use layerkit_core::gesture::{Direction, Gesture, GestureTracker};

// --- Layout re-exports -----------------------------------------------------

pub use layerkit_layout::{
    FitTo, Frame, LayoutKind, LayoutStrategy, NeighborSide, Neighbors, Scene, ScrollTransformer,
    StartPosition, Transform, TransformData, Transition, TransitionType,
};

// --- Runtime re-exports ----------------------------------------------------

pub use layerkit_runtime::{
    ActiveFrame, ConfigError, FrameResolutionError, GestureOutcome, Layer, LayerConfig,
    LayerError, LayerEvent, ObserveTarget, ResizeNotifier, ScrollData, TransitionPhase,
};

/// Standard result type for layerkit APIs.
pub type Result<T> = std::result::Result<T, LayerError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DeterministicClock, Direction, Frame, Gesture, GestureOutcome, Layer, LayerConfig,
        LayerError, LayerEvent, LayoutKind, Point, Result, Size, SystemClock, Transition,
        TransitionType,
    };

    pub use crate::{core, layout, runtime};
}

pub use layerkit_core as core;
pub use layerkit_layout as layout;
pub use layerkit_runtime as runtime;
