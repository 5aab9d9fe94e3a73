#![forbid(unsafe_code)]

//! The layer: transition controller for one container of frames.
//!
//! A [`Layer`] shows at most one frame at a time. It resolves frame
//! references through its [`FrameGraph`], asks the active
//! [`LayoutStrategy`] to prepare and animate frames, composes resting and
//! intermediate transforms through its [`ScrollTransformer`], and reports
//! progress as [`LayerEvent`]s.
//!
//! # Model
//!
//! Everything runs on one thread. Asynchronous layout steps hand back a
//! [`Deferred`]; the layer keeps the request that is waiting on it and
//! re-checks it from [`Layer::tick`]. Every request is stamped with a new
//! `transition_id`. A deferred step whose id no longer matches the layer's
//! is dropped without touching state: the newer request superseded it.
//!
//! `transition_to` commits the target frame, transform, and geometry as soon
//! as the hand-off starts, so reads during the animation already see the
//! target. Only the final resting transform and `TransitionFinished` wait
//! for the hand-off to complete.
//!
//! A [`TransitionTimer`] armed with the transition's duration bounds how
//! long the layer reports `in_transition`. If the deadline passes before the
//! hand-off reports back, the layer emits
//! [`LayerEvent::TransitionTimedOut`] and stops reporting the transition.
//!
//! # Example
//!
//! ```
//! # use std::time::Duration;
//! # use layerkit_core::clock::DeterministicClock;
//! # use layerkit_core::geometry::Size;
//! # use layerkit_layout::{Frame, Transition, TransitionType};
//! # use layerkit_runtime::{Layer, LayerConfig, LayerError, LayerEvent};
//! # fn main() -> Result<(), LayerError> {
//! let stage = Size::new(1024.0, 768.0);
//! let frames = vec![Frame::new("intro", stage), Frame::new("details", stage)];
//! let clock = DeterministicClock::new();
//! let mut layer = Layer::new(LayerConfig::default(), frames, Box::new(clock.clone()));
//! layer.attach(stage)?;
//! layer.tick();
//!
//! layer.transition_to(Transition::to("next").with_type(TransitionType::Left))?;
//! layer.tick();
//! clock.advance(Duration::from_secs(1));
//! layer.tick();
//!
//! assert_eq!(layer.current_frame().map(|f| f.name.as_str()), Some("details"));
//! let events = layer.drain_events();
//! assert!(events.contains(&LayerEvent::TransitionFinished(Some("details".into()))));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use layerkit_core::clock::Clock;
use layerkit_core::completion::Deferred;
use layerkit_core::geometry::{Point, Size};
use layerkit_core::gesture::Gesture;
use layerkit_core::logging::{debug, info_span, trace};
use layerkit_layout::{
    DefaultScrollTransformer, Frame, LayoutKind, LayoutStrategy, NeighborSide, Scene,
    ScrollResponse, ScrollTransformer, StartPosition, Transform, TransformData, Transition,
};

use crate::config::LayerConfig;
use crate::error::{FrameResolutionError, LayerError};
use crate::events::{EventQueue, LayerEvent};
use crate::frame_graph::{FrameGraph, FrameRef, side_token};
use crate::gesture_router::{GestureOutcome, GestureRouter, GestureTarget};
use crate::observer::{ObserveTarget, ResizeNotifier, SizeObserver, SizeSubscription};
use crate::timeout::TransitionTimer;

/// Which frame the layer shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveFrame {
    /// Nothing has been shown yet.
    #[default]
    Unresolved,
    /// The explicit empty state.
    Empty,
    Frame(String),
}

impl ActiveFrame {
    fn from_target(target: Option<&str>) -> Self {
        target.map_or(Self::Empty, |name| Self::Frame(name.to_string()))
    }

    /// Name of the shown frame.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Frame(name) => Some(name.as_str()),
            Self::Unresolved | Self::Empty => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Reference that shows this state again.
    fn reference(&self) -> Option<&str> {
        match self {
            Self::Unresolved => None,
            Self::Empty => Some("!none"),
            Self::Frame(name) => Some(name.as_str()),
        }
    }
}

/// Scroll position requested for a non-animated show.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollData {
    pub start_position: Option<StartPosition>,
    pub scroll_x: Option<f64>,
    pub scroll_y: Option<f64>,
}

impl ScrollData {
    pub fn at(scroll_x: f64, scroll_y: f64) -> Self {
        Self {
            start_position: None,
            scroll_x: Some(scroll_x),
            scroll_y: Some(scroll_y),
        }
    }

    pub fn from_start(start: StartPosition) -> Self {
        Self {
            start_position: Some(start),
            ..Self::default()
        }
    }
}

/// Coarse state of the transition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    /// The layout is preparing the target frame.
    Loading,
    /// A hand-off is animating.
    Animating,
}

#[derive(Debug)]
enum Request {
    Show(ScrollData),
    Transition(Transition),
}

#[derive(Debug)]
enum Step {
    Load(Deferred),
    Animate {
        done: Deferred,
        tfd: TransformData,
        scroll: Point,
    },
}

/// A request waiting on the layout.
#[derive(Debug)]
struct PendingOp {
    id: u64,
    target: Option<String>,
    request: Request,
    step: Step,
}

impl PendingOp {
    /// Scroll position the request asked for.
    fn scroll_data(&self) -> ScrollData {
        match &self.request {
            Request::Show(scroll) => *scroll,
            Request::Transition(transition) => ScrollData {
                start_position: transition.start_position,
                scroll_x: transition.scroll_x,
                scroll_y: transition.scroll_y,
            },
        }
    }
}

enum Progress {
    Waiting(PendingOp),
    Advanced(PendingOp),
    Done,
}

/// Container of frames with transition, scroll, and gesture logic.
pub struct Layer {
    config: LayerConfig,
    graph: FrameGraph,
    layout: Box<dyn LayoutStrategy>,
    transformer: Box<dyn ScrollTransformer>,
    router: GestureRouter,
    clock: Box<dyn Clock>,
    last_tick: Duration,
    stage: Option<Size>,
    observer: Box<dyn SizeObserver>,
    subscriptions: Vec<SizeSubscription>,
    current: ActiveFrame,
    current_transform: Transform,
    current_tfd: Option<TransformData>,
    transition_id: u64,
    in_transition: bool,
    timer: TransitionTimer,
    pending: Option<PendingOp>,
    resize_deferred: bool,
    events: EventQueue,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("layout", &self.layout.kind())
            .field("native_scroll", &self.transformer.is_native())
            .field("stage", &self.stage)
            .field("current", &self.current)
            .field("transition_id", &self.transition_id)
            .field("in_transition", &self.in_transition)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn derive_transformer(layout: &dyn LayoutStrategy, native: bool) -> Box<dyn ScrollTransformer> {
    layout
        .scroll_transformer(native)
        .unwrap_or_else(|| Box::new(DefaultScrollTransformer::new(native)))
}

impl Layer {
    /// Create a detached layer. Nothing is shown until [`attach`](Self::attach).
    pub fn new(config: LayerConfig, frames: Vec<Frame>, clock: Box<dyn Clock>) -> Self {
        let layout = config.layout_type.build(Size::default());
        let transformer = derive_transformer(layout.as_ref(), config.native_scroll);
        let router = GestureRouter::new(
            config.gesture_distance_threshold,
            config.ordinal_gesture_fallback,
        );
        let last_tick = clock.now_mono();
        Self {
            config,
            graph: FrameGraph::new(frames),
            layout,
            transformer,
            router,
            clock,
            last_tick,
            stage: None,
            observer: Box::new(ResizeNotifier::new()),
            subscriptions: Vec::new(),
            current: ActiveFrame::Unresolved,
            current_transform: Transform::IDENTITY,
            current_tfd: None,
            transition_id: 0,
            in_transition: false,
            timer: TransitionTimer::default(),
            pending: None,
            resize_deferred: false,
            events: EventQueue::default(),
        }
    }

    /// Create a layer from a JSON configuration document.
    pub fn from_json_config(
        json: &str,
        frames: Vec<Frame>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, LayerError> {
        let config = LayerConfig::from_json_str(json)?;
        Ok(Self::new(config, frames, clock))
    }

    /// Use `observer` for size-change notifications (builder).
    #[must_use]
    pub fn with_size_observer(mut self, observer: impl SizeObserver + 'static) -> Self {
        self.release_subscriptions();
        self.observer = Box::new(observer);
        if self.stage.is_some() {
            self.subscribe_all();
        }
        self
    }

    /// Use a custom layout strategy (builder).
    ///
    /// The scroll transformer is re-derived from the new layout.
    #[must_use]
    pub fn with_layout_strategy(mut self, layout: Box<dyn LayoutStrategy>) -> Self {
        self.config.layout_type = layout.kind();
        self.transformer = derive_transformer(layout.as_ref(), self.config.native_scroll);
        self.layout = layout;
        if let Some(stage) = self.stage {
            self.layout.set_stage(stage);
        }
        self
    }

    // -- lifecycle ----------------------------------------------------------

    /// Attach to a stage and show the default frame.
    pub fn attach(&mut self, stage: Size) -> Result<(), FrameResolutionError> {
        let _span = info_span!("layer.attach", width = stage.width, height = stage.height).entered();
        if self.stage.is_some() {
            self.set_stage_size(stage);
            return Ok(());
        }
        self.stage = Some(stage);
        self.layout.set_stage(stage);
        self.subscribe_all();
        self.render_frame_positions();

        let default = match (&self.config.default_frame, self.graph.frames().first()) {
            (Some(name), _) => name.clone(),
            (None, Some(first)) => first.name.clone(),
            (None, None) => "!none".to_string(),
        };
        self.show_frame(&default, None)
    }

    /// Detach from the stage. In-flight work is dropped.
    pub fn detach(&mut self) {
        let _span = info_span!("layer.detach").entered();
        self.release_subscriptions();
        self.stage = None;
        if let Some(op) = self.pending.take() {
            debug!(transition_id = op.id, "dropping pending request on detach");
        }
        self.in_transition = false;
        self.resize_deferred = false;
        self.timer.disarm();
    }

    pub fn is_attached(&self) -> bool {
        self.stage.is_some()
    }

    pub fn stage(&self) -> Option<Size> {
        self.stage
    }

    /// Replace the declared frames.
    ///
    /// If the shown frame disappeared the default frame is shown instead.
    pub fn set_frames(&mut self, frames: Vec<Frame>) -> Result<(), FrameResolutionError> {
        let _span = info_span!("layer.set_frames", count = frames.len()).entered();
        self.graph = FrameGraph::new(frames);
        self.layout.retain_frames(self.graph.frames());
        if self.stage.is_none() {
            return Ok(());
        }
        self.release_subscriptions();
        self.subscribe_all();
        self.render_frame_positions();

        let vanished = self
            .current
            .name()
            .is_some_and(|name| !self.graph.contains(name));
        if vanished {
            debug!("shown frame no longer declared");
            self.current = ActiveFrame::Unresolved;
            let fallback = match (&self.config.default_frame, self.graph.frames().first()) {
                (Some(name), _) if self.graph.contains(name) => name.clone(),
                (_, Some(first)) => first.name.clone(),
                _ => "!none".to_string(),
            };
            return self.show_frame(&fallback, None);
        }
        Ok(())
    }

    pub fn frames(&self) -> &[Frame] {
        self.graph.frames()
    }

    pub fn frame_graph(&self) -> &FrameGraph {
        &self.graph
    }

    /// The stage changed size.
    pub fn set_stage_size(&mut self, stage: Size) {
        if self.stage.is_none() {
            trace!("stage size ignored while detached");
            return;
        }
        self.stage = Some(stage);
        self.layout.set_stage(stage);
        self.on_resize();
    }

    // -- transitions --------------------------------------------------------

    /// Show a frame immediately, without animation.
    ///
    /// `name` may be a frame name or a special token; `"!none"` shows the
    /// empty state. Completion is reported through events once the layout
    /// has prepared the frame.
    pub fn show_frame(
        &mut self,
        name: &str,
        scroll: Option<ScrollData>,
    ) -> Result<(), FrameResolutionError> {
        let span = info_span!(
            "layer.show_frame",
            frame = name,
            transition_id = tracing::field::Empty
        );
        let _guard = span.enter();
        let reference = FrameRef::parse(name);
        let target = self
            .graph
            .resolve(&reference, self.current.name(), None)?
            .map(|f| f.name.clone());
        if self.stage.is_none() {
            debug!("show_frame ignored while detached");
            return Ok(());
        }

        self.transition_id += 1;
        span.record("transition_id", self.transition_id);
        self.set_in_transition(false, Duration::ZERO);
        self.events
            .push(LayerEvent::BeforeTransition(target.clone()));

        let frame = target.as_deref().and_then(|n| self.graph.get(n));
        let loading = self.layout.load_frame(frame);
        self.queue(PendingOp {
            id: self.transition_id,
            target,
            request: Request::Show(scroll.unwrap_or_default()),
            step: Step::Load(loading),
        });
        Ok(())
    }

    /// Start an animated hand-off.
    ///
    /// Accepts a frame name (or token) or a [`Transition`] descriptor.
    /// Returns the id stamped on the transition. Resolution errors are
    /// raised before any state changes.
    pub fn transition_to(
        &mut self,
        request: impl Into<Transition>,
    ) -> Result<u64, FrameResolutionError> {
        let mut transition = request.into();
        let name = transition
            .framename
            .clone()
            .ok_or(FrameResolutionError::MissingFrameName)?;
        let span = info_span!(
            "layer.transition_to",
            frame = %name,
            kind = ?transition.kind,
            transition_id = tracing::field::Empty
        );
        let _guard = span.enter();
        let reference = FrameRef::parse(&name);
        let target = self
            .graph
            .resolve(&reference, self.current.name(), Some(transition.kind))?
            .map(|f| f.name.clone());
        if self.stage.is_none() {
            debug!("transition_to ignored while detached");
            return Ok(self.transition_id);
        }

        if transition.duration.is_none() {
            transition.duration = Some(self.config.default_duration);
        }
        self.transition_id += 1;
        transition.transition_id = self.transition_id;
        span.record("transition_id", self.transition_id);

        self.events
            .push(LayerEvent::BeforeTransition(target.clone()));
        self.set_in_transition(true, transition.duration_or_zero());

        let frame = target.as_deref().and_then(|n| self.graph.get(n));
        let loading = self.layout.load_frame(frame);
        self.queue(PendingOp {
            id: self.transition_id,
            target,
            request: Request::Transition(transition),
            step: Step::Load(loading),
        });
        Ok(self.transition_id)
    }

    /// Whether a transition is in flight.
    ///
    /// Turns false on its own once the safety-net deadline has passed.
    pub fn in_transition(&self) -> bool {
        self.in_transition && !self.timer.is_expired(self.clock.now_mono())
    }

    /// Mark a transition as running for `duration`, or clear the mark.
    ///
    /// Setting arms the safety net keyed to the current transition id.
    pub fn set_in_transition(&mut self, in_transition: bool, duration: Duration) {
        self.in_transition = in_transition;
        if in_transition {
            self.timer
                .arm(self.transition_id, self.clock.now_mono(), duration);
        } else {
            self.timer.disarm();
        }
    }

    /// Time left in the current transition; `None` when idle.
    pub fn remaining_transition_time(&self) -> Option<Duration> {
        if !self.in_transition() {
            return None;
        }
        self.timer.remaining(self.clock.now_mono())
    }

    pub fn phase(&self) -> TransitionPhase {
        let busy = self.in_transition();
        match &self.pending {
            Some(PendingOp {
                request: Request::Show(_),
                ..
            }) => TransitionPhase::Loading,
            Some(op) if busy => match op.step {
                Step::Load(_) => TransitionPhase::Loading,
                Step::Animate { .. } => TransitionPhase::Animating,
            },
            _ if busy => TransitionPhase::Animating,
            _ => TransitionPhase::Idle,
        }
    }

    pub fn transition_id(&self) -> u64 {
        self.transition_id
    }

    // -- state --------------------------------------------------------------

    pub fn current_transform(&self) -> &Transform {
        &self.current_transform
    }

    /// Geometry of the shown frame.
    pub fn current_transform_data(&self) -> Option<&TransformData> {
        self.current_tfd.as_ref()
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.name().and_then(|name| self.graph.get(name))
    }

    pub fn active_frame(&self) -> &ActiveFrame {
        &self.current
    }

    pub fn scene(&self) -> &Scene {
        self.layout.scene()
    }

    pub fn layout_kind(&self) -> LayoutKind {
        self.layout.kind()
    }

    pub fn is_native_scroll(&self) -> bool {
        self.transformer.is_native()
    }

    /// Native scroll offset the host should apply.
    pub fn native_scroll(&self) -> Point {
        self.transformer.native_scroll()
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<LayerEvent> {
        self.events.drain()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    // -- reconfiguration ----------------------------------------------------

    /// Replace the layout strategy and re-show the current frame.
    ///
    /// A request still waiting on the old layout is re-issued on the new one.
    pub fn switch_layout(&mut self, kind: LayoutKind) -> Result<(), FrameResolutionError> {
        let _span = info_span!("layer.switch_layout", layout = %kind).entered();
        self.config.layout_type = kind;
        self.layout = kind.build(self.stage.unwrap_or_default());
        self.transformer = derive_transformer(self.layout.as_ref(), self.config.native_scroll);
        // The fresh layout shows nothing yet.
        self.current_tfd = None;
        self.render_frame_positions();
        self.reshow()
    }

    /// Switch between native and manual scrolling and re-show the current
    /// frame.
    pub fn switch_scrolling(&mut self, native: bool) -> Result<(), FrameResolutionError> {
        let _span = info_span!("layer.switch_scrolling", native).entered();
        if self.config.native_scroll == native {
            return Ok(());
        }
        self.config.native_scroll = native;
        self.transformer = derive_transformer(self.layout.as_ref(), native);
        self.reshow()
    }

    /// Show the current state again, or the target of the request that has
    /// not committed yet.
    fn reshow(&mut self) -> Result<(), FrameResolutionError> {
        if let Some(op) = &self.pending {
            let reference = op.target.clone().unwrap_or_else(|| "!none".to_string());
            let scroll = op.scroll_data();
            trace!(transition_id = op.id, frame = %reference, "re-issuing pending request");
            return self.show_frame(&reference, Some(scroll));
        }
        let Some(reference) = self.current.reference().map(str::to_string) else {
            return Ok(());
        };
        let scroll = ScrollData::at(self.current_transform.scroll_x, self.current_transform.scroll_y);
        self.show_frame(&reference, Some(scroll))
    }

    // -- host input ---------------------------------------------------------

    /// Advance time: layout animations, resize notifications, pending
    /// requests, and the safety net.
    pub fn tick(&mut self) {
        let now = self.clock.now_mono();
        let dt = now.saturating_sub(self.last_tick);
        self.last_tick = now;

        self.layout.tick(dt);
        if !self.observer.take_changes().is_empty() {
            self.resize_deferred = true;
        }
        self.poll();
        self.expire(now);
        if self.resize_deferred && !self.commit_in_flight() {
            self.on_resize();
        }
    }

    /// React to a size change of the stage or a frame.
    ///
    /// While a request has not committed yet (or a transition is running)
    /// nothing is re-shown; the resize is applied on the first tick after
    /// the request lands.
    pub fn on_resize(&mut self) {
        let _span = info_span!("layer.on_resize").entered();
        if self.commit_in_flight() {
            debug!("resize deferred until the pending request lands");
            self.resize_deferred = true;
            return;
        }
        self.resize_deferred = false;
        if self.stage.is_none() {
            return;
        }
        self.render_frame_positions();
        if let Err(err) = self.reshow() {
            debug!(%err, "re-show after resize failed");
        }
    }

    /// Record the platform's native scroll position.
    pub fn notify_native_scroll(&mut self, x: f64, y: f64) {
        if !self.transformer.is_native() {
            return;
        }
        self.transformer.set_native_scroll(Point::new(x, y));
        if !self.in_transition() {
            self.current_transform.scroll_x = x;
            self.current_transform.scroll_y = y;
        }
    }

    /// Route one gesture sample.
    pub fn handle_gesture(&mut self, gesture: &mut Gesture) -> GestureOutcome {
        let router = self.router;
        router.route(self, gesture)
    }

    /// Position every declared frame through the layout.
    pub fn render_frame_positions(&mut self) {
        for frame in self.graph.frames() {
            self.layout
                .render_frame_position(frame, &self.current_transform);
        }
    }

    // -- internals ----------------------------------------------------------

    fn subscribe_all(&mut self) {
        self.subscriptions
            .push(self.observer.observe(ObserveTarget::Stage));
        for frame in self.graph.frames() {
            let sub = self.observer.observe(ObserveTarget::Frame(frame.name.clone()));
            self.subscriptions.push(sub);
        }
    }

    fn release_subscriptions(&mut self) {
        for sub in self.subscriptions.drain(..) {
            self.observer.unobserve(sub);
        }
    }

    /// A request is waiting on the layout, or a transition is running.
    fn commit_in_flight(&self) -> bool {
        self.pending.is_some() || self.in_transition()
    }

    fn queue(&mut self, op: PendingOp) {
        if let Some(old) = self.pending.replace(op) {
            debug!(transition_id = old.id, "superseded before completion");
        }
        self.poll();
    }

    fn poll(&mut self) {
        let Some(mut op) = self.pending.take() else {
            return;
        };
        loop {
            if op.id != self.transition_id {
                debug!(transition_id = op.id, current = self.transition_id, "dropping superseded completion");
                return;
            }
            match self.advance(op) {
                Progress::Waiting(waiting) => {
                    self.pending = Some(waiting);
                    return;
                }
                Progress::Advanced(next) => op = next,
                Progress::Done => return,
            }
        }
    }

    fn advance(&mut self, op: PendingOp) -> Progress {
        let ready = match &op.step {
            Step::Load(done) | Step::Animate { done, .. } => done.is_resolved(),
        };
        if !ready {
            return Progress::Waiting(op);
        }
        match op.step {
            Step::Load(_) => match op.request {
                Request::Show(scroll) => {
                    self.complete_show(op.target, scroll);
                    Progress::Done
                }
                Request::Transition(transition) => self.start_handoff(op.id, op.target, transition),
            },
            Step::Animate { tfd, scroll, .. } => {
                self.finish_handoff(op.target, &tfd, scroll);
                Progress::Done
            }
        }
    }

    fn target_geometry(&self, target: Option<&str>, start: Option<StartPosition>) -> TransformData {
        let stage = self.stage.unwrap_or_default();
        match target.and_then(|name| self.graph.get(name)) {
            Some(frame) => frame.transform_data(stage, start),
            None => TransformData::empty(stage, start),
        }
    }

    fn is_current_state(&self, target: &ActiveFrame, transform: &Transform, tfd: &TransformData) -> bool {
        self.current == *target
            && self.current_transform == *transform
            && self.current_tfd.as_ref() == Some(tfd)
    }

    fn complete_show(&mut self, target: Option<String>, scroll: ScrollData) {
        let tfd = self.target_geometry(target.as_deref(), scroll.start_position);
        let transform = self.transformer.scroll_transform(
            &tfd,
            scroll.scroll_x.unwrap_or(tfd.initial_scroll.x),
            scroll.scroll_y.unwrap_or(tfd.initial_scroll.y),
            false,
        );
        let active = ActiveFrame::from_target(target.as_deref());
        if self.is_current_state(&active, &transform, &tfd) && !self.layout.is_animating() {
            trace!("show_frame to the current state");
            return;
        }

        self.current = active;
        self.current_transform = transform;
        self.current_tfd = Some(tfd);
        self.layout.mark_active(target.as_deref());
        self.events
            .push(LayerEvent::TransitionStarted(target.clone()));
        let frame = target.as_deref().and_then(|n| self.graph.get(n));
        self.layout.show_frame(frame, &tfd, &transform);
        self.events.push(LayerEvent::TransitionFinished(target));
    }

    fn start_handoff(&mut self, id: u64, target: Option<String>, transition: Transition) -> Progress {
        let tfd = self.target_geometry(target.as_deref(), transition.start_position);
        let scroll = Point::new(
            transition.scroll_x.unwrap_or(tfd.initial_scroll.x),
            transition.scroll_y.unwrap_or(tfd.initial_scroll.y),
        );
        let transform = self
            .transformer
            .scroll_transform(&tfd, scroll.x, scroll.y, true);
        let active = ActiveFrame::from_target(target.as_deref());

        if self.is_current_state(&active, &transform, &tfd) {
            trace!(transition_id = id, "transition to the current state");
            self.set_in_transition(false, Duration::ZERO);
            self.events
                .push(LayerEvent::TransitionStarted(target.clone()));
            self.events.push(LayerEvent::TransitionFinished(target));
            return Progress::Done;
        }

        let frame = target.as_deref().and_then(|n| self.graph.get(n));
        let done = self
            .layout
            .transition_to(frame, &transition, &tfd, &transform);
        self.layout.mark_active(target.as_deref());
        self.current = active;
        self.current_transform = transform;
        self.current_tfd = Some(tfd);
        self.events
            .push(LayerEvent::TransitionStarted(target.clone()));

        Progress::Advanced(PendingOp {
            id,
            target,
            request: Request::Transition(transition),
            step: Step::Animate { done, tfd, scroll },
        })
    }

    fn finish_handoff(&mut self, target: Option<String>, tfd: &TransformData, scroll: Point) {
        let transform = self
            .transformer
            .scroll_transform(tfd, scroll.x, scroll.y, false);
        self.current_transform = transform;
        self.layout.set_layer_transform(tfd, &transform);
        self.set_in_transition(false, Duration::ZERO);
        self.events.push(LayerEvent::TransitionFinished(target));
    }

    fn expire(&mut self, now: Duration) {
        let Some(id) = self.timer.take_expired(now) else {
            return;
        };
        if id != self.transition_id || !self.in_transition {
            return;
        }
        self.in_transition = false;
        if let Some(op) = self.pending.as_ref().filter(|op| op.id == id) {
            debug!(transition_id = id, frame = ?op.target, "transition timed out");
            self.events
                .push(LayerEvent::TransitionTimedOut(op.target.clone()));
        }
    }
}

impl GestureTarget for Layer {
    fn current_frame(&self) -> Option<&Frame> {
        Layer::current_frame(self)
    }

    fn in_transition(&self) -> bool {
        Layer::in_transition(self)
    }

    fn scroll_gesture(&mut self, gesture: &Gesture) -> ScrollResponse {
        match &self.current_tfd {
            Some(tfd) => self
                .transformer
                .scroll_gesture(gesture, tfd, &self.current_transform),
            None => ScrollResponse::NotScroll,
        }
    }

    fn apply_layer_transform(&mut self, transform: Transform) {
        self.current_transform = transform;
        if let Some(tfd) = &self.current_tfd {
            self.layout.set_layer_transform(tfd, &transform);
        }
    }

    fn has_target(&self, side: NeighborSide, ordinal_fallback: bool) -> bool {
        self.graph
            .has_target(self.current.name(), side, ordinal_fallback)
    }

    fn transition_toward(&mut self, side: NeighborSide) -> Result<u64, FrameResolutionError> {
        self.transition_to(Transition::to(side_token(side)).with_type(side.transition_type()))
    }
}
