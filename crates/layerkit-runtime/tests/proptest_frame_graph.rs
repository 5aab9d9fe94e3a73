//! Property-based invariants for frame resolution and supersession.
//!
//! 1. `next` then `previous` returns to the starting frame, and vice versa.
//! 2. Stepping `next` `n` times over `n` frames is a full cycle.
//! 3. Directional tokens always resolve while frames exist.
//! 4. After any burst of requests the layer settles on the last one and
//!    reports exactly one `TransitionFinished`.

use std::time::Duration;

use layerkit_core::clock::DeterministicClock;
use layerkit_core::geometry::Size;
use layerkit_layout::{Frame, NeighborSide, Transition, TransitionType};
use layerkit_runtime::{FrameGraph, FrameRef, Layer, LayerConfig, LayerEvent};
use proptest::prelude::*;

const STAGE: Size = Size::new(320.0, 240.0);

fn graph(count: usize) -> FrameGraph {
    FrameGraph::new((0..count).map(|i| Frame::new(format!("f{i}"), STAGE)).collect())
}

fn transition_type() -> impl Strategy<Value = TransitionType> {
    prop_oneof![
        Just(TransitionType::Default),
        Just(TransitionType::None),
        Just(TransitionType::Left),
        Just(TransitionType::Right),
        Just(TransitionType::Up),
        Just(TransitionType::Down),
        Just(TransitionType::Fade),
    ]
}

fn side() -> impl Strategy<Value = NeighborSide> {
    prop_oneof![
        Just(NeighborSide::Left),
        Just(NeighborSide::Right),
        Just(NeighborSide::Top),
        Just(NeighborSide::Bottom),
    ]
}

proptest! {
    #[test]
    fn ordinal_steps_are_inverse((count, start) in (1usize..12).prop_flat_map(|n| (Just(n), 0..n))) {
        let g = graph(count);
        let name = format!("f{start}");
        let forward = g.next(Some(&name)).unwrap().name.clone();
        prop_assert_eq!(&g.previous(Some(&forward)).unwrap().name, &name);
        let backward = g.previous(Some(&name)).unwrap().name.clone();
        prop_assert_eq!(&g.next(Some(&backward)).unwrap().name, &name);
    }

    #[test]
    fn next_cycles_through_every_frame(count in 1usize..12) {
        let g = graph(count);
        let mut current = "f0".to_string();
        let mut seen = Vec::new();
        for _ in 0..count {
            current = g.next(Some(&current)).unwrap().name.clone();
            seen.push(current.clone());
        }
        prop_assert_eq!(&current, "f0");
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), count);
    }

    #[test]
    fn directional_tokens_always_resolve(
        (count, start) in (1usize..8).prop_flat_map(|n| (Just(n), 0..n)),
        side in side(),
        kind in transition_type(),
    ) {
        let g = graph(count);
        let name = format!("f{start}");
        let resolved = g.resolve(&FrameRef::Side(side), Some(&name), Some(kind));
        prop_assert!(matches!(resolved, Ok(Some(_))));
    }

    #[test]
    fn burst_settles_on_last_request(targets in prop::collection::vec(0usize..4, 1..6)) {
        let clock = DeterministicClock::new();
        let frames = (0..4).map(|i| Frame::new(format!("f{i}"), STAGE)).collect();
        let mut layer = Layer::new(LayerConfig::default(), frames, Box::new(clock.clone()));
        layer.attach(STAGE).unwrap();
        layer.tick();
        layer.drain_events();

        for &target in &targets {
            let name = format!("f{target}");
            layer
                .transition_to(Transition::to(name).with_duration(Duration::from_millis(200)))
                .unwrap();
        }
        layer.tick();
        clock.advance(Duration::from_millis(200));
        layer.tick();

        let last = format!("f{}", targets[targets.len() - 1]);
        prop_assert_eq!(layer.current_frame().map(|f| f.name.clone()), Some(last.clone()));
        prop_assert!(!layer.in_transition());
        let finished: Vec<_> = layer
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, LayerEvent::TransitionFinished(_)))
            .collect();
        prop_assert_eq!(finished, vec![LayerEvent::TransitionFinished(Some(last))]);
    }
}
