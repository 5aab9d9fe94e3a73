//! Property-based invariants for frame geometry and scroll composition.
//!
//! 1. Scroll offsets in a transform never leave `[0, max_scroll]`.
//! 2. Non-scrolling axes always report zero scroll.
//! 3. Manual transforms translate by exactly the negated scroll offset.
//! 4. The initial scroll of every start position lies inside the extents.

use layerkit_core::geometry::Size;
use layerkit_layout::{
    DefaultScrollTransformer, FitTo, Frame, ScrollTransformer, StartPosition,
};
use proptest::prelude::*;

fn fit_to() -> impl Strategy<Value = FitTo> {
    prop_oneof![
        Just(FitTo::Width),
        Just(FitTo::Height),
        Just(FitTo::Fixed),
        Just(FitTo::Contain),
        Just(FitTo::Cover),
        Just(FitTo::Responsive),
        Just(FitTo::ResponsiveWidth),
        Just(FitTo::ResponsiveHeight),
    ]
}

fn start_position() -> impl Strategy<Value = StartPosition> {
    prop_oneof![
        Just(StartPosition::Top),
        Just(StartPosition::Bottom),
        Just(StartPosition::Left),
        Just(StartPosition::Right),
        Just(StartPosition::Middle),
        Just(StartPosition::TopLeft),
        Just(StartPosition::TopRight),
        Just(StartPosition::BottomLeft),
        Just(StartPosition::BottomRight),
    ]
}

proptest! {
    #[test]
    fn transforms_stay_within_extents(
        w in 1.0f64..5000.0,
        h in 1.0f64..5000.0,
        fit in fit_to(),
        sx in -10_000.0f64..10_000.0,
        sy in -10_000.0f64..10_000.0,
        native in any::<bool>(),
        intermediate in any::<bool>(),
    ) {
        let stage = Size::new(800.0, 600.0);
        let tfd = Frame::new("f", Size::new(w, h)).with_fit_to(fit).transform_data(stage, None);
        let mut st = DefaultScrollTransformer::new(native);
        let t = st.scroll_transform(&tfd, sx, sy, intermediate);

        prop_assert!(t.scroll_x >= 0.0 && t.scroll_x <= tfd.max_scroll_x);
        prop_assert!(t.scroll_y >= 0.0 && t.scroll_y <= tfd.max_scroll_y);
        if !tfd.is_scroll_x() {
            prop_assert_eq!(t.scroll_x, 0.0);
        }
        if !tfd.is_scroll_y() {
            prop_assert_eq!(t.scroll_y, 0.0);
        }
        if !native {
            prop_assert_eq!(t.shift_x, -t.scroll_x);
            prop_assert_eq!(t.shift_y, -t.scroll_y);
        }
        prop_assert_eq!(t.scale, tfd.scale);
    }

    #[test]
    fn initial_scroll_inside_extents(
        w in 1.0f64..5000.0,
        h in 1.0f64..5000.0,
        fit in fit_to(),
        start in start_position(),
    ) {
        let stage = Size::new(1024.0, 768.0);
        let tfd = Frame::new("f", Size::new(w, h))
            .with_fit_to(fit)
            .transform_data(stage, Some(start));
        prop_assert!(tfd.initial_scroll.x >= 0.0 && tfd.initial_scroll.x <= tfd.max_scroll_x);
        prop_assert!(tfd.initial_scroll.y >= 0.0 && tfd.initial_scroll.y <= tfd.max_scroll_y);
        prop_assert!(tfd.shift_x >= 0.0 && tfd.shift_y >= 0.0);
    }
}
