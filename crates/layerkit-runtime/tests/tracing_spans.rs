//! Tracing instrumentation of layer operations.
//!
//! Captures spans with a registry layer and checks that the public
//! operations open the expected spans with their identifying fields.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use layerkit_core::clock::DeterministicClock;
use layerkit_core::geometry::Size;
use layerkit_layout::{Frame, LayoutKind};
use layerkit_runtime::{Layer, LayerConfig};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    ids: Arc<Mutex<HashMap<tracing::span::Id, usize>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let mut spans = self.spans.lock().unwrap();
        self.ids.lock().unwrap().insert(id.clone(), spans.len());
        spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        values.record(&mut visitor);
        let Some(&index) = self.ids.lock().unwrap().get(id) else {
            return;
        };
        if let Some(span) = self.spans.lock().unwrap().get_mut(index) {
            span.fields.extend(visitor.0);
        }
    }
}

fn with_captured_spans<F: FnOnce()>(f: F) -> Vec<CapturedSpan> {
    let capture = SpanCapture::default();
    let spans = Arc::clone(&capture.spans);
    let subscriber = tracing_subscriber::registry().with(capture);
    tracing::subscriber::with_default(subscriber, f);
    let captured = spans.lock().unwrap().clone();
    captured
}

fn named<'a>(spans: &'a [CapturedSpan], name: &str) -> Vec<&'a CapturedSpan> {
    spans.iter().filter(|s| s.name == name).collect()
}

fn layer(clock: &DeterministicClock) -> Layer {
    let frames = vec![
        Frame::new("a", Size::new(100.0, 100.0)),
        Frame::new("b", Size::new(100.0, 100.0)),
    ];
    Layer::new(LayerConfig::default(), frames, Box::new(clock.clone()))
}

#[test]
fn operations_open_spans() {
    let spans = with_captured_spans(|| {
        let clock = DeterministicClock::new();
        let mut layer = layer(&clock);
        layer.attach(Size::new(100.0, 100.0)).unwrap();
        layer.tick();
        layer.transition_to("b").unwrap();
        layer.switch_layout(LayoutKind::Stack).unwrap();
        layer.switch_scrolling(false).unwrap();
    });

    assert_eq!(named(&spans, "layer.attach").len(), 1);
    assert_eq!(named(&spans, "layer.switch_layout").len(), 1);
    assert_eq!(named(&spans, "layer.switch_scrolling").len(), 1);

    let transitions = named(&spans, "layer.transition_to");
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].fields.get("frame").map(String::as_str), Some("b"));
    assert_eq!(
        transitions[0].fields.get("transition_id").map(String::as_str),
        Some("2")
    );

    let shows = named(&spans, "layer.show_frame");
    assert!(shows.len() >= 3, "attach and both switches re-show: {shows:?}");
    assert_eq!(shows[0].fields.get("frame").map(String::as_str), Some("a"));
    assert_eq!(shows[0].fields.get("transition_id").map(String::as_str), Some("1"));
}

#[test]
fn rejected_request_records_no_id() {
    let spans = with_captured_spans(|| {
        let clock = DeterministicClock::new();
        let mut layer = layer(&clock);
        layer.attach(Size::new(100.0, 100.0)).unwrap();
        assert!(layer.transition_to("zzz").is_err());
    });

    let transitions = named(&spans, "layer.transition_to");
    assert_eq!(transitions.len(), 1);
    assert!(!transitions[0].fields.contains_key("transition_id"));
}

#[test]
fn stage_resize_opens_span() {
    let spans = with_captured_spans(|| {
        let clock = DeterministicClock::new();
        let mut layer = layer(&clock);
        layer.attach(Size::new(100.0, 100.0)).unwrap();
        layer.tick();
        layer.set_stage_size(Size::new(200.0, 200.0));
    });
    assert_eq!(named(&spans, "layer.on_resize").len(), 1);
}
