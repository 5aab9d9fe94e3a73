#![forbid(unsafe_code)]

//! Gesture routing.
//!
//! [`GestureRouter`] decides what one gesture sample means for a layer:
//! platform scrolling, a manual scroll update, a discrete transition to a
//! neighbor, or nothing. The layer side is abstracted as a
//! [`GestureTarget`] so routing can be exercised without a full layer.
//!
//! Routing order:
//!
//! 1. No current frame: ignored.
//! 2. The scroll transformer sees every sample; the first sample of a drag
//!    stops there.
//! 3. Native scroll: left to the platform.
//! 4. Manual scroll: the transform is applied and the sample consumed.
//! 5. Otherwise the sample is a transition candidate. It is consumed while
//!    a transition runs, and when it points at a reachable neighbor. The
//!    transition itself is triggered on the terminal sample, or on a wheel
//!    sample that travelled past the threshold.
//! 6. Directionless samples below the threshold are swallowed.

use layerkit_core::gesture::{DEFAULT_DISTANCE_THRESHOLD, Gesture};
use layerkit_core::logging::{debug, trace};
use layerkit_layout::{Frame, NeighborSide, ScrollResponse, Transform};

use crate::error::FrameResolutionError;

/// What routing did with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No current frame, or the first sample of a drag.
    Ignored,
    /// The platform scrolls natively.
    NativeScroll,
    /// A manual scroll transform was applied.
    Scrolled,
    /// Swallowed without effect.
    Consumed,
    /// A transition with this id was started.
    Triggered(u64),
    /// Not handled here; the host may bubble it.
    Unhandled,
}

/// The layer operations routing needs.
pub trait GestureTarget {
    fn current_frame(&self) -> Option<&Frame>;

    fn in_transition(&self) -> bool;

    /// Ask the scroll transformer to interpret the sample.
    fn scroll_gesture(&mut self, gesture: &Gesture) -> ScrollResponse;

    /// Apply a manual scroll transform immediately.
    fn apply_layer_transform(&mut self, transform: Transform);

    /// Whether a swipe towards `side` has somewhere to go.
    fn has_target(&self, side: NeighborSide, ordinal_fallback: bool) -> bool;

    /// Start a transition towards `side`.
    fn transition_toward(&mut self, side: NeighborSide) -> Result<u64, FrameResolutionError>;
}

/// Routes gesture samples to scrolling or frame transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureRouter {
    distance_threshold: f64,
    ordinal_fallback: bool,
}

impl Default for GestureRouter {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            ordinal_fallback: true,
        }
    }
}

impl GestureRouter {
    pub fn new(distance_threshold: f64, ordinal_fallback: bool) -> Self {
        Self {
            distance_threshold,
            ordinal_fallback,
        }
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    pub fn ordinal_fallback(&self) -> bool {
        self.ordinal_fallback
    }

    /// Route one sample. Sets `gesture.prevent_default` when the sample is
    /// consumed.
    ///
    /// The router's threshold replaces whatever the sample carried.
    pub fn route(&self, target: &mut dyn GestureTarget, gesture: &mut Gesture) -> GestureOutcome {
        gesture.set_distance_threshold(self.distance_threshold);
        if target.current_frame().is_none() {
            trace!("gesture without current frame dropped");
            return GestureOutcome::Ignored;
        }

        let response = target.scroll_gesture(gesture);
        if gesture.first {
            return GestureOutcome::Ignored;
        }

        match response {
            ScrollResponse::Native => GestureOutcome::NativeScroll,
            ScrollResponse::Manual(transform) => {
                target.apply_layer_transform(transform);
                gesture.prevent_default = true;
                GestureOutcome::Scrolled
            }
            ScrollResponse::NotScroll => self.route_transition(target, gesture),
        }
    }

    fn route_transition(&self, target: &mut dyn GestureTarget, gesture: &mut Gesture) -> GestureOutcome {
        let busy = target.in_transition();
        if busy {
            gesture.prevent_default = true;
        }

        let Some(direction) = gesture.direction else {
            if gesture.enough_distance() {
                return if busy {
                    GestureOutcome::Consumed
                } else {
                    GestureOutcome::Unhandled
                };
            }
            gesture.prevent_default = true;
            return GestureOutcome::Consumed;
        };

        let side = NeighborSide::from_direction(direction);
        if !target.has_target(side, self.ordinal_fallback) {
            return if busy {
                GestureOutcome::Consumed
            } else {
                GestureOutcome::Unhandled
            };
        }

        gesture.prevent_default = true;
        let terminal = gesture.last || (gesture.wheel && gesture.enough_distance());
        if busy || !terminal {
            return GestureOutcome::Consumed;
        }
        match target.transition_toward(side) {
            Ok(id) => GestureOutcome::Triggered(id),
            Err(err) => {
                debug!(%err, ?side, "gesture transition rejected");
                GestureOutcome::Consumed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerkit_core::geometry::{Point, Size};
    use layerkit_core::gesture::Direction;

    #[derive(Debug)]
    struct Target {
        frame: Option<Frame>,
        busy: bool,
        response: ScrollResponse,
        neighbor: bool,
        applied: Vec<Transform>,
        triggered: Vec<NeighborSide>,
    }

    impl Target {
        fn new(response: ScrollResponse) -> Self {
            Self {
                frame: Some(Frame::new("f", Size::new(100.0, 100.0))),
                busy: false,
                response,
                neighbor: true,
                applied: Vec::new(),
                triggered: Vec::new(),
            }
        }
    }

    impl GestureTarget for Target {
        fn current_frame(&self) -> Option<&Frame> {
            self.frame.as_ref()
        }

        fn in_transition(&self) -> bool {
            self.busy
        }

        fn scroll_gesture(&mut self, _gesture: &Gesture) -> ScrollResponse {
            self.response
        }

        fn apply_layer_transform(&mut self, transform: Transform) {
            self.applied.push(transform);
        }

        fn has_target(&self, _side: NeighborSide, ordinal_fallback: bool) -> bool {
            self.neighbor || ordinal_fallback
        }

        fn transition_toward(&mut self, side: NeighborSide) -> Result<u64, FrameResolutionError> {
            self.triggered.push(side);
            Ok(self.triggered.len() as u64)
        }
    }

    fn swipe(direction: Direction) -> Gesture {
        Gesture::new(Point::new(0.0, -40.0), Point::new(0.0, -5.0)).with_direction(direction)
    }

    #[test]
    fn no_frame_is_ignored() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        target.frame = None;
        let mut g = swipe(Direction::Up).last();
        assert_eq!(GestureRouter::default().route(&mut target, &mut g), GestureOutcome::Ignored);
        assert!(!g.prevent_default);
    }

    #[test]
    fn first_sample_stops_after_scroll_transformer() {
        let mut target = Target::new(ScrollResponse::Manual(Transform::IDENTITY));
        let mut g = swipe(Direction::Up).first();
        assert_eq!(GestureRouter::default().route(&mut target, &mut g), GestureOutcome::Ignored);
        assert!(target.applied.is_empty());
    }

    #[test]
    fn native_scroll_is_left_alone() {
        let mut target = Target::new(ScrollResponse::Native);
        let mut g = swipe(Direction::Up).last();
        assert_eq!(
            GestureRouter::default().route(&mut target, &mut g),
            GestureOutcome::NativeScroll
        );
        assert!(!g.prevent_default);
        assert!(target.triggered.is_empty());
    }

    #[test]
    fn manual_scroll_applies_transform() {
        let t = Transform {
            shift_y: -12.0,
            ..Transform::IDENTITY
        };
        let mut target = Target::new(ScrollResponse::Manual(t));
        let mut g = swipe(Direction::Up);
        assert_eq!(GestureRouter::default().route(&mut target, &mut g), GestureOutcome::Scrolled);
        assert!(g.prevent_default);
        assert_eq!(target.applied, vec![t]);
    }

    #[test]
    fn terminal_swipe_triggers_transition() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        let router = GestureRouter::default();

        let mut moving = swipe(Direction::Left);
        assert_eq!(router.route(&mut target, &mut moving), GestureOutcome::Consumed);
        assert!(moving.prevent_default);
        assert!(target.triggered.is_empty());

        let mut ending = swipe(Direction::Left).last();
        assert_eq!(router.route(&mut target, &mut ending), GestureOutcome::Triggered(1));
        assert_eq!(target.triggered, vec![NeighborSide::Right]);
    }

    #[test]
    fn wheel_needs_distance() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        let router = GestureRouter::new(50.0, true);
        let mut short = swipe(Direction::Up).wheel();
        assert_eq!(router.route(&mut target, &mut short), GestureOutcome::Consumed);

        let mut long = Gesture::new(Point::new(0.0, -60.0), Point::new(0.0, -20.0))
            .with_direction(Direction::Up)
            .wheel();
        assert_eq!(router.route(&mut target, &mut long), GestureOutcome::Triggered(1));
        assert_eq!(target.triggered, vec![NeighborSide::Bottom]);
    }

    #[test]
    fn router_threshold_overrides_sample_threshold() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        let router = GestureRouter::new(50.0, true);
        // The sample alone would count 40px as far enough.
        let mut g = swipe(Direction::Up).wheel().with_distance_threshold(5.0);
        assert!(g.enough_distance());
        assert_eq!(router.route(&mut target, &mut g), GestureOutcome::Consumed);
        assert_eq!(g.distance_threshold(), 50.0);
        assert!(!g.enough_distance());
        assert!(target.triggered.is_empty());
    }

    #[test]
    fn busy_layer_swallows_without_triggering() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        target.busy = true;
        let mut g = swipe(Direction::Down).last();
        assert_eq!(GestureRouter::default().route(&mut target, &mut g), GestureOutcome::Consumed);
        assert!(g.prevent_default);
        assert!(target.triggered.is_empty());
    }

    #[test]
    fn unreachable_direction_is_unhandled() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        target.neighbor = false;
        let mut g = swipe(Direction::Right).last();
        let router = GestureRouter::new(10.0, false);
        assert_eq!(router.route(&mut target, &mut g), GestureOutcome::Unhandled);
        assert!(!g.prevent_default);
    }

    #[test]
    fn small_directionless_movement_is_swallowed() {
        let mut target = Target::new(ScrollResponse::NotScroll);
        let router = GestureRouter::default();
        let mut small = Gesture::new(Point::new(2.0, 3.0), Point::new(1.0, 1.0));
        assert_eq!(router.route(&mut target, &mut small), GestureOutcome::Consumed);
        assert!(small.prevent_default);

        let mut large = Gesture::new(Point::new(20.0, 30.0), Point::new(1.0, 1.0));
        assert_eq!(router.route(&mut target, &mut large), GestureOutcome::Unhandled);
        assert!(!large.prevent_default);
    }
}
