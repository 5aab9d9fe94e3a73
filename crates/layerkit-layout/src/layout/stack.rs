#![forbid(unsafe_code)]

//! Stacked layout: frames share the origin, the target is raised on top.

use std::time::Duration;

use layerkit_core::completion::Deferred;
use layerkit_core::geometry::{Point, Size};

use super::{HandOff, HandOffDriver, LayoutKind, LayoutStrategy, Placement, Scene, resting_placement};
use crate::frame::{Frame, TransformData};
use crate::transform::Transform;
use crate::transition::{Transition, TransitionType};

#[derive(Debug)]
pub struct StackLayout {
    stage: Size,
    scene: Scene,
    driver: HandOffDriver,
    shown: Option<String>,
}

impl StackLayout {
    pub fn new(stage: Size) -> Self {
        Self {
            stage,
            scene: Scene::default(),
            driver: HandOffDriver::default(),
            shown: None,
        }
    }

    fn cover_offset(&self, kind: TransitionType) -> Option<Point> {
        match kind {
            TransitionType::Left => Some(Point::new(self.stage.width, 0.0)),
            TransitionType::Right => Some(Point::new(-self.stage.width, 0.0)),
            TransitionType::Up => Some(Point::new(0.0, self.stage.height)),
            TransitionType::Down => Some(Point::new(0.0, -self.stage.height)),
            TransitionType::Default | TransitionType::Fade | TransitionType::None => None,
        }
    }
}

impl LayoutStrategy for StackLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Stack
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
            let z = self.scene.top_z().max(1);
            *self.scene.placement_mut(name) = resting_placement(tfd, transform, z);
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
        let target = frame.map(|f| f.name.as_str());
        let mut handoff = HandOff::new(duration, transition.timing.easing());

        // The outgoing frame stays put underneath and disappears at the end.
        if let Some(outgoing) = self.shown.as_deref().filter(|&name| Some(name) != target) {
            let from = self.scene.frame(outgoing).copied().unwrap_or_default();
            let to = Placement {
                visible: false,
                ..from
            };
            handoff = handoff.frame(outgoing, from, to);
        }

        if let Some(name) = target {
            let same = self.shown.as_deref() == Some(name);
            let z = if same {
                self.scene.frame(name).map_or(1, |p| p.z_index)
            } else {
                self.scene.top_z() + 1
            };
            let rest = resting_placement(tfd, transform, z);
            let from = match (same, self.cover_offset(transition.kind)) {
                (true, _) => self.scene.frame(name).copied().unwrap_or(rest),
                (false, Some(offset)) => Placement {
                    position: rest.position.offset(offset),
                    ..rest
                },
                (false, None) => Placement {
                    opacity: 0.0,
                    ..rest
                },
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
        let shown = self.shown.as_deref() == Some(frame.name.as_str());
        let animating = self.driver.is_animating();
        let placement = self.scene.placement_mut(&frame.name);
        if shown && !animating {
            *placement = resting_placement(&tfd, transform, placement.z_index.max(1));
        } else if !placement.visible {
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

    const STAGE: Size = Size::new(400.0, 300.0);

    fn go(layout: &mut StackLayout, name: &str, kind: TransitionType) -> Deferred {
        let f = Frame::new(name, STAGE);
        let tfd = f.transform_data(STAGE, None);
        let t = Transition::to(name)
            .with_type(kind)
            .with_duration(Duration::from_millis(100))
            .with_timing(Timing::Linear);
        layout.transition_to(Some(&f), &t, &tfd, &Transform::IDENTITY)
    }

    #[test]
    fn target_is_raised_and_faded_in() {
        let mut layout = StackLayout::new(STAGE);
        let _ = go(&mut layout, "a", TransitionType::None);
        let done = go(&mut layout, "b", TransitionType::Default);

        let a = layout.scene().frame("a").copied().unwrap();
        let b = layout.scene().frame("b").copied().unwrap();
        assert!(b.z_index > a.z_index);
        assert_eq!(b.opacity, 0.0);
        assert_eq!(layout.scene().visible_frames(), vec!["a", "b"]);

        layout.tick(Duration::from_millis(100));
        assert!(done.is_resolved());
        assert_eq!(layout.scene().visible_frames(), vec!["b"]);
        assert_eq!(layout.scene().frame("b").map(|p| p.opacity), Some(1.0));
    }

    #[test]
    fn directional_type_covers_from_the_side() {
        let mut layout = StackLayout::new(STAGE);
        let _ = go(&mut layout, "a", TransitionType::None);
        let _ = go(&mut layout, "b", TransitionType::Up);
        let b = layout.scene().frame("b").copied().unwrap();
        assert_eq!(b.position, Point::new(0.0, 300.0));
        assert_eq!(b.opacity, 1.0);
        assert_eq!(layout.scene().frame("a").map(|p| p.position), Some(Point::ZERO));
    }

    #[test]
    fn revisiting_keeps_growing_z_order() {
        let mut layout = StackLayout::new(STAGE);
        let _ = go(&mut layout, "a", TransitionType::None);
        let _ = go(&mut layout, "b", TransitionType::None);
        let _ = go(&mut layout, "a", TransitionType::None);
        assert_eq!(layout.scene().visible_frames(), vec!["a"]);
        let a = layout.scene().frame("a").map(|p| p.z_index).unwrap();
        let b = layout.scene().frame("b").map(|p| p.z_index).unwrap();
        assert!(a > b);
    }
}
