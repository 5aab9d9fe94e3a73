#![forbid(unsafe_code)]

//! Free-form canvas layout.
//!
//! Every frame sits at its declared canvas position `(x, y)` inside the
//! layer. Showing a frame moves the *layer* so that frame lands on the stage:
//!
//! ```text
//! translation = centring shift + scroll shift - scale * (x, y)
//! ```
//!
//! Hand-offs animate that layer translation and scale. Scrolling is always
//! manual here because the whole layer moves.

use std::time::Duration;

use layerkit_core::completion::Deferred;
use layerkit_core::geometry::{Point, Size};

use super::{HandOff, HandOffDriver, LayerPlacement, LayoutKind, LayoutStrategy, Placement, Scene};
use crate::frame::{Frame, TransformData};
use crate::scroll::{DefaultScrollTransformer, ScrollTransformer};
use crate::transform::Transform;
use crate::transition::{Transition, TransitionType};

#[derive(Debug)]
pub struct CanvasLayout {
    stage: Size,
    scene: Scene,
    driver: HandOffDriver,
}

impl CanvasLayout {
    pub fn new(stage: Size) -> Self {
        Self {
            stage,
            scene: Scene::default(),
            driver: HandOffDriver::default(),
        }
    }

    /// Layer placement that brings the frame described by `tfd` on stage.
    pub fn layer_placement(tfd: &TransformData, transform: &Transform) -> LayerPlacement {
        let scale = transform.scale;
        LayerPlacement {
            translation: Point::new(
                tfd.shift_x + transform.shift_x - scale * tfd.position.x,
                tfd.shift_y + transform.shift_y - scale * tfd.position.y,
            ),
            scale,
        }
    }

    fn place(&mut self, frame: &Frame) {
        *self.scene.placement_mut(&frame.name) = Placement {
            position: Point::new(frame.x, frame.y),
            visible: true,
            ..Placement::default()
        };
    }
}

impl LayoutStrategy for CanvasLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Canvas
    }

    fn set_stage(&mut self, stage: Size) {
        self.stage = stage;
    }

    fn load_frame(&mut self, frame: Option<&Frame>) -> Deferred {
        let loading = self.driver.load(&mut self.scene, frame);
        if let Some(frame) = frame {
            self.place(frame);
        }
        loading
    }

    fn show_frame(&mut self, _frame: Option<&Frame>, tfd: &TransformData, transform: &Transform) {
        self.driver.finish(&mut self.scene);
        self.scene.set_layer(Self::layer_placement(tfd, transform));
    }

    fn transition_to(
        &mut self,
        _frame: Option<&Frame>,
        transition: &Transition,
        tfd: &TransformData,
        transform: &Transform,
    ) -> Deferred {
        let duration = match transition.kind {
            TransitionType::None => Duration::ZERO,
            _ => transition.duration_or_zero(),
        };
        // Snap first so the tween starts from where the layer really is.
        self.driver.finish(&mut self.scene);
        let handoff = HandOff::new(duration, transition.timing.easing())
            .layer(self.scene.layer(), Self::layer_placement(tfd, transform));
        self.driver.start(&mut self.scene, handoff)
    }

    fn set_layer_transform(&mut self, tfd: &TransformData, transform: &Transform) {
        self.scene.set_layer(Self::layer_placement(tfd, transform));
    }

    fn render_frame_position(&mut self, frame: &Frame, _transform: &Transform) {
        self.place(frame);
    }

    fn scroll_transformer(&self, _native: bool) -> Option<Box<dyn ScrollTransformer>> {
        Some(Box::new(DefaultScrollTransformer::manual()))
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
