#![forbid(unsafe_code)]

//! Pluggable layout strategies.
//!
//! A [`LayoutStrategy`] owns the visual placement of frames. It renders into
//! a [`Scene`]: one [`Placement`] per frame plus a [`LayerPlacement`] for the
//! layer itself. Hosts read the scene after every [`LayoutStrategy::tick`]
//! and mirror it onto their surface.
//!
//! Asynchronous steps (preparing a frame, running a hand-off) return a
//! [`Deferred`] that the strategy resolves from its own tick.
//!
//! # Invariants
//!
//! 1. At most one hand-off runs at a time. Starting another snaps the running
//!    one to its end state and resolves its completion first.
//! 2. A hand-off with zero duration is applied immediately and returns an
//!    already-resolved completion.
//! 3. Loading the empty state (`None`) or a frame that is already visible
//!    resolves immediately.

mod canvas;
mod slide;
mod stack;

pub use canvas::CanvasLayout;
pub use slide::SlideLayout;
pub use stack::StackLayout;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use layerkit_core::animation::{Animation, EasingFn, Fade, Lerp, Tween};
use layerkit_core::completion::{Deferred, Resolver};
use layerkit_core::geometry::{Point, Size};

use crate::frame::{Frame, TransformData};
use crate::scroll::ScrollTransformer;
use crate::transform::Transform;
use crate::transition::Transition;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Where and how one frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Origin of the frame, in layer coordinates.
    pub position: Point,
    pub scale: f64,
    pub opacity: f64,
    pub visible: bool,
    pub z_index: i32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: 1.0,
            opacity: 1.0,
            visible: false,
            z_index: 0,
        }
    }
}

impl Placement {
    /// Interpolated placement at eased progress `t`.
    ///
    /// The frame stays visible while either endpoint is visible and takes
    /// its final z-order right away.
    fn blend(&self, to: &Placement, t: f64) -> Placement {
        Placement {
            position: self.position.lerp(to.position, t),
            scale: self.scale.lerp(to.scale, t),
            opacity: self.opacity.lerp(to.opacity, t),
            visible: self.visible || to.visible,
            z_index: to.z_index,
        }
    }
}

/// Transform applied to the layer containing every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlacement {
    pub translation: Point,
    pub scale: f64,
}

impl Default for LayerPlacement {
    fn default() -> Self {
        Self {
            translation: Point::ZERO,
            scale: 1.0,
        }
    }
}

impl Lerp for LayerPlacement {
    fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            translation: self.translation.lerp(to.translation, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// Observable render state of a layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    frames: BTreeMap<String, Placement>,
    layer: LayerPlacement,
    active: Option<String>,
}

impl Scene {
    /// Placement of `name`, if the layout has touched it.
    pub fn frame(&self, name: &str) -> Option<&Placement> {
        self.frames.get(name)
    }

    /// All placements ordered by frame name.
    pub fn frames(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.frames.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// Names of visible frames, lowest z-order first.
    pub fn visible_frames(&self) -> Vec<&str> {
        let mut visible: Vec<(&str, i32)> = self
            .frames
            .iter()
            .filter(|(_, p)| p.visible)
            .map(|(name, p)| (name.as_str(), p.z_index))
            .collect();
        visible.sort_by_key(|&(_, z)| z);
        visible.into_iter().map(|(name, _)| name).collect()
    }

    /// Whether `name` is currently drawn.
    pub fn is_visible(&self, name: &str) -> bool {
        self.frames.get(name).is_some_and(|p| p.visible)
    }

    pub fn layer(&self) -> LayerPlacement {
        self.layer
    }

    /// Frame carrying the active marker.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, name: Option<&str>) {
        self.active = name.map(str::to_string);
    }

    /// Highest z-order in use.
    pub fn top_z(&self) -> i32 {
        self.frames.values().map(|p| p.z_index).max().unwrap_or(0)
    }

    pub(crate) fn placement_mut(&mut self, name: &str) -> &mut Placement {
        self.frames.entry(name.to_string()).or_default()
    }

    pub(crate) fn set_layer(&mut self, layer: LayerPlacement) {
        self.layer = layer;
    }

    /// Hide every frame except `keep`.
    pub(crate) fn hide_others(&mut self, keep: Option<&str>) {
        for (name, placement) in &mut self.frames {
            if Some(name.as_str()) != keep {
                placement.visible = false;
            }
        }
    }

    /// Forget frames no longer declared.
    pub(crate) fn retain(&mut self, declared: &[Frame]) {
        self.frames
            .retain(|name, _| declared.iter().any(|f| &f.name == name));
        if let Some(active) = &self.active
            && !declared.iter().any(|f| &f.name == active)
        {
            self.active = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Layout kind
// ---------------------------------------------------------------------------

/// Built-in layout strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Slide,
    Canvas,
    Stack,
}

impl LayoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Canvas => "canvas",
            Self::Stack => "stack",
        }
    }

    /// Instantiate the strategy for a stage.
    pub fn build(self, stage: Size) -> Box<dyn LayoutStrategy> {
        match self {
            Self::Slide => Box::new(SlideLayout::new(stage)),
            Self::Canvas => Box::new(CanvasLayout::new(stage)),
            Self::Stack => Box::new(StackLayout::new(stage)),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized layout name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLayoutKindError(pub String);

impl fmt::Display for ParseLayoutKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown layout type: {:?}", self.0)
    }
}

impl std::error::Error for ParseLayoutKindError {}

impl FromStr for LayoutKind {
    type Err = ParseLayoutKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slide" => Ok(Self::Slide),
            "canvas" => Ok(Self::Canvas),
            "stack" => Ok(Self::Stack),
            _ => Err(ParseLayoutKindError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy contract
// ---------------------------------------------------------------------------

/// Produces frame placement and performs animated hand-offs.
pub trait LayoutStrategy: fmt::Debug {
    fn kind(&self) -> LayoutKind;

    /// Stage size changed.
    fn set_stage(&mut self, stage: Size);

    /// Prepare `frame` for display; `None` is the empty state.
    fn load_frame(&mut self, frame: Option<&Frame>) -> Deferred;

    /// Show `frame` at rest, without animation.
    fn show_frame(&mut self, frame: Option<&Frame>, tfd: &TransformData, transform: &Transform);

    /// Animate from whatever is shown to `frame`.
    ///
    /// The completion resolves when the hand-off has finished (or was cut
    /// short by a newer one).
    fn transition_to(
        &mut self,
        frame: Option<&Frame>,
        transition: &Transition,
        tfd: &TransformData,
        transform: &Transform,
    ) -> Deferred;

    /// Apply a resting transform for the shown frame.
    fn set_layer_transform(&mut self, tfd: &TransformData, transform: &Transform);

    /// Position one declared frame within the layout's coordinate scheme.
    fn render_frame_position(&mut self, frame: &Frame, transform: &Transform);

    /// Layout-specific scroll transformer, if the layout needs one.
    fn scroll_transformer(&self, _native: bool) -> Option<Box<dyn ScrollTransformer>> {
        None
    }

    /// Advance animations and resolve pending completions.
    fn tick(&mut self, dt: Duration);

    /// Whether a hand-off is running.
    fn is_animating(&self) -> bool;

    fn scene(&self) -> &Scene;

    fn scene_mut(&mut self) -> &mut Scene;

    /// Move the active marker.
    fn mark_active(&mut self, name: Option<&str>) {
        self.scene_mut().set_active(name);
    }

    /// Drop placements for frames that are no longer declared.
    fn retain_frames(&mut self, declared: &[Frame]) {
        self.scene_mut().retain(declared);
    }
}

// ---------------------------------------------------------------------------
// Shared hand-off machinery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct FrameTrack {
    name: String,
    from: Placement,
    to: Placement,
}

/// One animated hand-off: frame tracks plus an optional layer track.
///
/// The layer track is a [`Tween`] sharing the hand-off's duration and easing;
/// both advance together.
#[derive(Debug)]
pub(crate) struct HandOff {
    duration: Duration,
    easing: EasingFn,
    clock: Fade,
    frames: Vec<FrameTrack>,
    layer: Option<Tween<LayerPlacement>>,
}

impl HandOff {
    pub(crate) fn new(duration: Duration, easing: EasingFn) -> Self {
        Self {
            duration,
            easing,
            clock: Fade::new(duration).easing(easing),
            frames: Vec::new(),
            layer: None,
        }
    }

    #[must_use]
    pub(crate) fn frame(mut self, name: &str, from: Placement, to: Placement) -> Self {
        self.frames.push(FrameTrack {
            name: name.to_string(),
            from,
            to,
        });
        self
    }

    #[must_use]
    pub(crate) fn layer(mut self, from: LayerPlacement, to: LayerPlacement) -> Self {
        self.layer = Some(Tween::new(from, to, self.duration).easing(self.easing));
        self
    }

    fn tick(&mut self, dt: Duration) {
        self.clock.tick(dt);
        if let Some(layer) = self.layer.as_mut() {
            layer.tick(dt);
        }
    }

    fn finish(&mut self) {
        self.clock.finish();
        if let Some(layer) = self.layer.as_mut() {
            layer.finish();
        }
    }

    fn apply(&self, scene: &mut Scene) {
        let t = self.clock.value();
        for track in &self.frames {
            *scene.placement_mut(&track.name) = track.from.blend(&track.to, t);
        }
        if let Some(layer) = &self.layer {
            scene.set_layer(layer.current());
        }
    }

    fn apply_end(&self, scene: &mut Scene) {
        for track in &self.frames {
            *scene.placement_mut(&track.name) = track.to;
        }
        if let Some(layer) = &self.layer {
            scene.set_layer(layer.target());
        }
    }
}

/// Runs hand-offs and frame loads for a strategy.
#[derive(Debug, Default)]
pub(crate) struct HandOffDriver {
    running: Option<(HandOff, Resolver)>,
    loading: Vec<Resolver>,
}

impl HandOffDriver {
    /// Prepare a frame: invisible frames become drawable (transparent) and
    /// finish loading on the next tick.
    pub(crate) fn load(&mut self, scene: &mut Scene, frame: Option<&Frame>) -> Deferred {
        let Some(frame) = frame else {
            return Deferred::resolved();
        };
        let placement = scene.placement_mut(&frame.name);
        if placement.visible {
            return Deferred::resolved();
        }
        placement.visible = true;
        placement.opacity = 0.0;
        tracing::trace!(frame = %frame.name, "loading frame");
        let (deferred, resolver) = Deferred::pending();
        self.loading.push(resolver);
        deferred
    }

    /// Start a hand-off, snapping any running one to its end first.
    pub(crate) fn start(&mut self, scene: &mut Scene, handoff: HandOff) -> Deferred {
        self.finish(scene);
        if handoff.clock.is_complete() {
            handoff.apply_end(scene);
            return Deferred::resolved();
        }
        handoff.apply(scene);
        let (deferred, resolver) = Deferred::pending();
        self.running = Some((handoff, resolver));
        deferred
    }

    /// Snap the running hand-off to its end state and resolve it.
    pub(crate) fn finish(&mut self, scene: &mut Scene) {
        if let Some((mut handoff, resolver)) = self.running.take() {
            if !handoff.clock.is_complete() {
                tracing::trace!(remaining = ?handoff.clock.remaining(), "snapping running hand-off");
            }
            handoff.finish();
            handoff.apply_end(scene);
            resolver.resolve();
        }
    }

    pub(crate) fn tick(&mut self, scene: &mut Scene, dt: Duration) {
        for resolver in self.loading.drain(..) {
            resolver.resolve();
        }
        let Some((handoff, _)) = self.running.as_mut() else {
            return;
        };
        handoff.tick(dt);
        if handoff.clock.is_complete() {
            self.finish(scene);
        } else {
            handoff.apply(scene);
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.running.is_some()
    }
}

/// Resting placement of a frame shown full-stage with `transform`.
pub(crate) fn resting_placement(tfd: &TransformData, transform: &Transform, z_index: i32) -> Placement {
    Placement {
        position: Point::new(tfd.shift_x, tfd.shift_y).offset(transform.translation()),
        scale: transform.scale,
        opacity: 1.0,
        visible: true,
        z_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerkit_core::animation::linear;

    fn shown(x: f64) -> Placement {
        Placement {
            position: Point::new(x, 0.0),
            visible: true,
            ..Placement::default()
        }
    }

    #[test]
    fn layout_kind_parses_case_insensitively() {
        assert_eq!("Canvas".parse::<LayoutKind>(), Ok(LayoutKind::Canvas));
        assert_eq!(" stack ".parse::<LayoutKind>(), Ok(LayoutKind::Stack));
        assert_eq!(
            "grid".parse::<LayoutKind>(),
            Err(ParseLayoutKindError("grid".into()))
        );
        assert_eq!(LayoutKind::Slide.to_string(), "slide");
        assert_eq!(LayoutKind::Canvas.build(Size::new(1.0, 1.0)).kind(), LayoutKind::Canvas);
    }

    #[test]
    fn driver_runs_handoff_to_completion() {
        let mut scene = Scene::default();
        let mut driver = HandOffDriver::default();
        let handoff = HandOff::new(Duration::from_millis(100), linear).frame(
            "a",
            shown(0.0),
            shown(100.0),
        );
        let done = driver.start(&mut scene, handoff);
        assert!(!done.is_resolved());
        assert!(driver.is_animating());

        driver.tick(&mut scene, Duration::from_millis(50));
        assert_eq!(scene.frame("a").map(|p| p.position.x), Some(50.0));
        assert!(!done.is_resolved());

        driver.tick(&mut scene, Duration::from_millis(60));
        assert!(done.is_resolved());
        assert!(!driver.is_animating());
        assert_eq!(scene.frame("a").map(|p| p.position.x), Some(100.0));
    }

    #[test]
    fn new_handoff_snaps_running_one() {
        let mut scene = Scene::default();
        let mut driver = HandOffDriver::default();
        let first = driver.start(
            &mut scene,
            HandOff::new(Duration::from_secs(1), linear).frame("a", shown(0.0), shown(10.0)),
        );
        let second = driver.start(
            &mut scene,
            HandOff::new(Duration::from_secs(1), linear).frame("b", shown(0.0), shown(20.0)),
        );
        assert!(first.is_resolved());
        assert!(!second.is_resolved());
        assert_eq!(scene.frame("a").map(|p| p.position.x), Some(10.0));
    }

    #[test]
    fn zero_duration_handoff_is_immediate() {
        let mut scene = Scene::default();
        let mut driver = HandOffDriver::default();
        let done = driver.start(
            &mut scene,
            HandOff::new(Duration::ZERO, linear).layer(
                LayerPlacement::default(),
                LayerPlacement {
                    translation: Point::new(-5.0, 0.0),
                    scale: 2.0,
                },
            ),
        );
        assert!(done.is_resolved());
        assert!(!driver.is_animating());
        assert_eq!(scene.layer().scale, 2.0);
    }

    #[test]
    fn loading_resolves_on_next_tick() {
        let mut scene = Scene::default();
        let mut driver = HandOffDriver::default();
        let frame = Frame::new("a", Size::new(10.0, 10.0));
        assert!(driver.load(&mut scene, None).is_resolved());

        let loading = driver.load(&mut scene, Some(&frame));
        assert!(!loading.is_resolved());
        assert!(scene.is_visible("a"));
        assert_eq!(scene.frame("a").map(|p| p.opacity), Some(0.0));

        driver.tick(&mut scene, Duration::ZERO);
        assert!(loading.is_resolved());
        assert!(driver.load(&mut scene, Some(&frame)).is_resolved(), "already visible");
    }

    #[test]
    fn visible_frames_sorted_by_z() {
        let mut scene = Scene::default();
        *scene.placement_mut("low") = Placement { z_index: 1, ..shown(0.0) };
        *scene.placement_mut("high") = Placement { z_index: 5, ..shown(0.0) };
        *scene.placement_mut("hidden") = Placement::default();
        assert_eq!(scene.visible_frames(), vec!["low", "high"]);
        assert_eq!(scene.top_z(), 5);
        scene.hide_others(Some("high"));
        assert_eq!(scene.visible_frames(), vec!["high"]);
    }
}
