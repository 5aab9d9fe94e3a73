#![forbid(unsafe_code)]

//! Layer lifecycle events.
//!
//! Events are queued while the layer works and drained by the host with
//! [`Layer::drain_events`](crate::Layer::drain_events). For one request
//! they always arrive in the order `BeforeTransition`, `TransitionStarted`,
//! `TransitionFinished`. Frame names are `None` for the empty state.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerEvent {
    /// A request was accepted; nothing has changed yet.
    BeforeTransition(Option<String>),
    /// The target state is committed and the hand-off begins.
    TransitionStarted(Option<String>),
    /// The hand-off completed and the layer is at rest.
    TransitionFinished(Option<String>),
    /// The safety-net deadline passed before the hand-off reported back.
    TransitionTimedOut(Option<String>),
}

impl LayerEvent {
    /// Frame the event refers to.
    pub fn frame(&self) -> Option<&str> {
        match self {
            Self::BeforeTransition(f)
            | Self::TransitionStarted(f)
            | Self::TransitionFinished(f)
            | Self::TransitionTimedOut(f) => f.as_deref(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BeforeTransition(_) => "beforeTransition",
            Self::TransitionStarted(_) => "transitionStarted",
            Self::TransitionFinished(_) => "transitionFinished",
            Self::TransitionTimedOut(_) => "transitionTimedOut",
        }
    }
}

impl fmt::Display for LayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame() {
            Some(frame) => write!(f, "{}({frame})", self.name()),
            None => write!(f, "{}(none)", self.name()),
        }
    }
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: Vec<LayerEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: LayerEvent) {
        tracing::trace!(event = %event, "layer event");
        self.events.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<LayerEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}
