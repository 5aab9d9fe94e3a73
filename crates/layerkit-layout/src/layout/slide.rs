#![forbid(unsafe_code)]

//! Paging layout: one frame fills the stage, hand-offs slide or fade.

use std::time::Duration;

use layerkit_core::completion::Deferred;
use layerkit_core::geometry::{Point, Size};

use super::{HandOff, HandOffDriver, LayoutKind, LayoutStrategy, Placement, Scene, resting_placement};
use crate::frame::{Frame, TransformData};
use crate::transform::Transform;
use crate::transition::{Transition, TransitionType};

/// Slides frames in and out along the transition direction.
///
/// `Default` transitions behave like `Left`; `None` swaps instantly.
#[derive(Debug)]
pub struct SlideLayout {
    stage: Size,
    scene: Scene,
    driver: HandOffDriver,
    shown: Option<String>,
}

impl SlideLayout {
    pub fn new(stage: Size) -> Self {
        Self {
            stage,
            scene: Scene::default(),
            driver: HandOffDriver::default(),
            shown: None,
        }
    }

    /// Offset at which an incoming frame starts (and the negation of where
    /// the outgoing one ends).
    fn entry_offset(&self, kind: TransitionType) -> Point {
        match kind {
            TransitionType::Left | TransitionType::Default => Point::new(self.stage.width, 0.0),
            TransitionType::Right => Point::new(-self.stage.width, 0.0),
            TransitionType::Up => Point::new(0.0, self.stage.height),
            TransitionType::Down => Point::new(0.0, -self.stage.height),
            TransitionType::Fade | TransitionType::None => Point::ZERO,
        }
    }
}

impl LayoutStrategy for SlideLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Slide
    }

    fn set_stage(&mut self, stage: Size) {
        self.stage = stage;
    }

    fn load_frame(&mut self, frame: Option<&Frame>) -> Deferred {
        self.driver.load(&mut self.scene, frame)
    }

    fn show_frame(&mut self, frame: Option<&Frame>, tfd: &TransformData, transform: &Transform) {
        self.driver.finish(&mut self.scene);
        let name = frame.map(|f| f.name.as_str());
        self.scene.hide_others(name);
        if let Some(name) = name {
            *self.scene.placement_mut(name) = resting_placement(tfd, transform, 1);
        }
        self.shown = name.map(str::to_string);
    }

    fn transition_to(
        &mut self,
        frame: Option<&Frame>,
        transition: &Transition,
        tfd: &TransformData,
        transform: &Transform,
    ) -> Deferred {
        let duration = match transition.kind {
            TransitionType::None => Duration::ZERO,
            _ => transition.duration_or_zero(),
        };
        let fade = transition.kind == TransitionType::Fade;
        let offset = self.entry_offset(transition.kind);
        let target = frame.map(|f| f.name.as_str());
        let mut handoff = HandOff::new(duration, transition.timing.easing());

        if let Some(outgoing) = self.shown.as_deref().filter(|&name| Some(name) != target) {
            let from = self.scene.frame(outgoing).copied().unwrap_or(Placement {
                visible: true,
                ..Placement::default()
            });
            let to = Placement {
                position: from.position.offset(Point::new(-offset.x, -offset.y)),
                opacity: if fade { 0.0 } else { from.opacity },
                visible: false,
                z_index: 0,
                ..from
            };
            handoff = handoff.frame(outgoing, from, to);
        }

        if let Some(name) = target {
            let rest = resting_placement(tfd, transform, 1);
            let from = if self.shown.as_deref() == Some(name) {
                self.scene.frame(name).copied().unwrap_or(rest)
            } else {
                Placement {
                    position: rest.position.offset(offset),
                    opacity: if fade { 0.0 } else { 1.0 },
                    ..rest
                }
            };
            handoff = handoff.frame(name, from, rest);
        }

        self.shown = target.map(str::to_string);
        self.driver.start(&mut self.scene, handoff)
    }

    fn set_layer_transform(&mut self, tfd: &TransformData, transform: &Transform) {
        if let Some(name) = self.shown.as_deref() {
            let z = self.scene.frame(name).map_or(1, |p| p.z_index);
            *self.scene.placement_mut(name) = resting_placement(tfd, transform, z);
        }
    }

    fn render_frame_position(&mut self, frame: &Frame, transform: &Transform) {
        let tfd = frame.transform_data(self.stage, None);
        if self.shown.as_deref() == Some(frame.name.as_str()) {
            if !self.driver.is_animating() {
                *self.scene.placement_mut(&frame.name) = resting_placement(&tfd, transform, 1);
            }
            return;
        }
        let placement = self.scene.placement_mut(&frame.name);
        if !placement.visible {
            placement.position = Point::new(tfd.shift_x, tfd.shift_y);
            placement.scale = tfd.scale;
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.driver.tick(&mut self.scene, dt);
    }

    fn is_animating(&self) -> bool {
        self.driver.is_animating()
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerkit_core::animation::Timing;

    const STAGE: Size = Size::new(800.0, 600.0);

    fn frame(name: &str) -> Frame {
        Frame::new(name, STAGE)
    }

    fn show(layout: &mut SlideLayout, f: &Frame) {
        let tfd = f.transform_data(STAGE, None);
        layout.show_frame(Some(f), &tfd, &Transform::IDENTITY);
    }

    fn slide(layout: &mut SlideLayout, f: &Frame, kind: TransitionType) -> Deferred {
        let tfd = f.transform_data(STAGE, None);
        let t = Transition::to(f.name.clone())
            .with_type(kind)
            .with_duration(Duration::from_millis(200))
            .with_timing(Timing::Linear);
        layout.transition_to(Some(f), &t, &tfd, &Transform::IDENTITY)
    }

    #[test]
    fn show_frame_hides_everything_else() {
        let mut layout = SlideLayout::new(STAGE);
        show(&mut layout, &frame("a"));
        show(&mut layout, &frame("b"));
        assert_eq!(layout.scene().visible_frames(), vec!["b"]);
        assert_eq!(layout.scene().frame("b").map(|p| p.position), Some(Point::ZERO));
    }

    #[test]
    fn left_slide_moves_both_frames() {
        let mut layout = SlideLayout::new(STAGE);
        show(&mut layout, &frame("a"));
        let done = slide(&mut layout, &frame("b"), TransitionType::Left);
        assert_eq!(layout.scene().frame("b").map(|p| p.position.x), Some(800.0));

        layout.tick(Duration::from_millis(100));
        assert_eq!(layout.scene().frame("a").map(|p| p.position.x), Some(-400.0));
        assert_eq!(layout.scene().frame("b").map(|p| p.position.x), Some(400.0));
        assert_eq!(layout.scene().visible_frames().len(), 2);

        layout.tick(Duration::from_millis(100));
        assert!(done.is_resolved());
        assert_eq!(layout.scene().visible_frames(), vec!["b"]);
        assert_eq!(layout.scene().frame("b").map(|p| p.position.x), Some(0.0));
    }

    #[test]
    fn down_slide_enters_from_above() {
        let mut layout = SlideLayout::new(STAGE);
        show(&mut layout, &frame("a"));
        let _ = slide(&mut layout, &frame("b"), TransitionType::Down);
        assert_eq!(layout.scene().frame("b").map(|p| p.position.y), Some(-600.0));
    }

    #[test]
    fn fade_crossfades_in_place() {
        let mut layout = SlideLayout::new(STAGE);
        show(&mut layout, &frame("a"));
        let _ = slide(&mut layout, &frame("b"), TransitionType::Fade);
        layout.tick(Duration::from_millis(50));
        let b = layout.scene().frame("b").copied().unwrap();
        assert_eq!(b.position, Point::ZERO);
        assert!((b.opacity - 0.25).abs() < 1e-9);
    }

    #[test]
    fn none_type_is_instant() {
        let mut layout = SlideLayout::new(STAGE);
        show(&mut layout, &frame("a"));
        let done = slide(&mut layout, &frame("b"), TransitionType::None);
        assert!(done.is_resolved());
        assert!(!layout.is_animating());
        assert_eq!(layout.scene().visible_frames(), vec!["b"]);
    }

    #[test]
    fn transition_to_empty_state_slides_out() {
        let mut layout = SlideLayout::new(STAGE);
        show(&mut layout, &frame("a"));
        let tfd = TransformData::empty(STAGE, None);
        let t = Transition::default().with_duration(Duration::from_millis(10));
        let done = layout.transition_to(None, &t, &tfd, &Transform::IDENTITY);
        layout.tick(Duration::from_millis(10));
        assert!(done.is_resolved());
        assert!(layout.scene().visible_frames().is_empty());
    }

    #[test]
    fn layer_transform_moves_shown_frame() {
        let mut layout = SlideLayout::new(STAGE);
        let tall = Frame::new("tall", Size::new(800.0, 2000.0));
        show(&mut layout, &tall);
        let tfd = tall.transform_data(STAGE, None);
        let transform = Transform {
            shift_y: -300.0,
            scroll_y: 300.0,
            is_scroll_y: true,
            ..Transform::IDENTITY
        };
        layout.set_layer_transform(&tfd, &transform);
        assert_eq!(
            layout.scene().frame("tall").map(|p| p.position),
            Some(Point::new(0.0, -300.0))
        );
    }
}
