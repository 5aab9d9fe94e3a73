#![forbid(unsafe_code)]

//! Runtime: the layer transition controller.
//!
//! - [`Layer`] - shows one frame at a time and animates hand-offs between
//!   frames through a [`LayoutStrategy`](layerkit_layout::LayoutStrategy)
//! - [`FrameGraph`] - frame lookup, special tokens, and neighbor navigation
//! - [`GestureRouter`] - turns gesture samples into scrolling or transitions
//! - [`LayerConfig`] - JSON and environment driven configuration
//! - [`LayerEvent`] - lifecycle notifications drained by the host
//!
//! # Supersession
//!
//! Every accepted request increments the layer's `transition_id`. Work
//! started for an older id is dropped when it completes, so a burst of
//! requests always settles on the most recent one.

pub mod config;
pub mod error;
pub mod events;
pub mod frame_graph;
pub mod gesture_router;
pub mod layer;
pub mod observer;
pub mod timeout;

pub use config::{DEFAULT_TRANSITION_DURATION, LayerConfig};
pub use error::{ConfigError, FrameResolutionError, LayerError};
pub use events::LayerEvent;
pub use frame_graph::{FrameGraph, FrameRef, side_token};
pub use gesture_router::{GestureOutcome, GestureRouter, GestureTarget};
pub use layer::{ActiveFrame, Layer, ScrollData, TransitionPhase};
pub use observer::{ObserveTarget, ResizeNotifier, SizeObserver, SizeSubscription};
pub use timeout::TransitionTimer;
