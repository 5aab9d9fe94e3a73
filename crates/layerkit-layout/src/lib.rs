#![forbid(unsafe_code)]

//! Frame geometry, scroll transforms, and layout strategies.
//!
//! - [`Frame`] / [`TransformData`] - declared frames and their fitted geometry
//! - [`Transform`] - the renderable layer transform
//! - [`Transition`] - hand-off descriptors
//! - [`ScrollTransformer`] - gesture and scroll composition (native or manual)
//! - [`LayoutStrategy`] - slide, canvas, and stack layouts rendering into a [`Scene`]

pub mod frame;
pub mod layout;
pub mod scroll;
pub mod transform;
pub mod transition;

pub use frame::{FitTo, Frame, NeighborSide, Neighbors, StartPosition, TransformData};
pub use layout::{
    CanvasLayout, LayerPlacement, LayoutKind, LayoutStrategy, ParseLayoutKindError, Placement,
    Scene, SlideLayout, StackLayout,
};
pub use scroll::{DefaultScrollTransformer, ScrollResponse, ScrollTransformer};
pub use transform::Transform;
pub use transition::{DurationParseError, Transition, TransitionType, parse_duration};
