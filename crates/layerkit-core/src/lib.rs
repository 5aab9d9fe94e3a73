#![forbid(unsafe_code)]

//! Core: geometry, animation, gestures, clocks, and deferred completions.
//!
//! These are the leaf primitives shared by the layout strategies in
//! `layerkit-layout` and the transition controller in `layerkit-runtime`.

pub mod animation;
pub mod clock;
pub mod completion;
pub mod geometry;
pub mod gesture;
pub mod logging;
