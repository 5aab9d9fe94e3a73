#![forbid(unsafe_code)]

//! Size-change observation.
//!
//! A layer registers its stage and each declared frame with a
//! [`SizeObserver`] and keeps the returned [`SizeSubscription`] handles.
//! Releasing a handle through [`SizeObserver::unobserve`] ends the
//! observation; there is no global registry.
//!
//! [`ResizeNotifier`] is the in-process observer: the host keeps a clone and
//! calls [`ResizeNotifier::notify`] whenever a surface changes size. The
//! layer drains the pending notifications on its next tick.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// What a subscription watches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObserveTarget {
    Stage,
    Frame(String),
}

/// Handle for one observation. Inactive once released.
#[derive(Debug)]
pub struct SizeSubscription {
    id: u64,
    target: ObserveTarget,
    active: Rc<Cell<bool>>,
}

impl SizeSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> &ObserveTarget {
        &self.target
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Source of size-change notifications.
pub trait SizeObserver: fmt::Debug {
    /// Start observing `target`.
    fn observe(&mut self, target: ObserveTarget) -> SizeSubscription;

    /// Stop the observation behind `subscription`.
    fn unobserve(&mut self, subscription: SizeSubscription);

    /// Observed targets that changed size since the last call.
    fn take_changes(&mut self) -> Vec<ObserveTarget>;
}

#[derive(Debug, Default)]
struct NotifierState {
    next_id: u64,
    subscriptions: Vec<(u64, ObserveTarget, Rc<Cell<bool>>)>,
    changed: Vec<ObserveTarget>,
}

/// Shared, single-threaded [`SizeObserver`].
///
/// Clones share state: the layer owns one clone, the host another.
#[derive(Debug, Clone, Default)]
pub struct ResizeNotifier {
    state: Rc<RefCell<NotifierState>>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that `target` changed size.
    ///
    /// Returns `false` (and records nothing) when nobody observes it.
    pub fn notify(&self, target: ObserveTarget) -> bool {
        let mut state = self.state.borrow_mut();
        let observed = state.subscriptions.iter().any(|(_, t, _)| *t == target);
        if observed && !state.changed.contains(&target) {
            state.changed.push(target);
        }
        observed
    }

    /// Number of live subscriptions.
    pub fn observed_count(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }

    pub fn is_observed(&self, target: &ObserveTarget) -> bool {
        self.state
            .borrow()
            .subscriptions
            .iter()
            .any(|(_, t, _)| t == target)
    }
}

impl SizeObserver for ResizeNotifier {
    fn observe(&mut self, target: ObserveTarget) -> SizeSubscription {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        let active = Rc::new(Cell::new(true));
        state
            .subscriptions
            .push((id, target.clone(), Rc::clone(&active)));
        SizeSubscription { id, target, active }
    }

    fn unobserve(&mut self, subscription: SizeSubscription) {
        let mut state = self.state.borrow_mut();
        state.subscriptions.retain(|(id, _, _)| *id != subscription.id);
        subscription.active.set(false);
        let target = subscription.target;
        if !state.subscriptions.iter().any(|(_, t, _)| *t == target) {
            state.changed.retain(|t| *t != target);
        }
    }

    fn take_changes(&mut self) -> Vec<ObserveTarget> {
        std::mem::take(&mut self.state.borrow_mut().changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_need_a_subscription() {
        let host = ResizeNotifier::new();
        let mut layer_side = host.clone();
        assert!(!host.notify(ObserveTarget::Stage));

        let sub = layer_side.observe(ObserveTarget::Stage);
        assert!(sub.is_active());
        assert!(host.notify(ObserveTarget::Stage));
        assert!(host.notify(ObserveTarget::Stage), "coalesced, still observed");
        assert_eq!(layer_side.take_changes(), vec![ObserveTarget::Stage]);
        assert!(layer_side.take_changes().is_empty());
    }

    #[test]
    fn unobserve_releases_the_handle() {
        let host = ResizeNotifier::new();
        let mut layer_side = host.clone();
        let sub = layer_side.observe(ObserveTarget::Frame("a".into()));
        let active = Rc::clone(&sub.active);
        host.notify(ObserveTarget::Frame("a".into()));

        layer_side.unobserve(sub);
        assert!(!active.get());
        assert_eq!(host.observed_count(), 0);
        assert!(layer_side.take_changes().is_empty(), "pending change dropped");
        assert!(!host.notify(ObserveTarget::Frame("a".into())));
    }

    #[test]
    fn ids_are_unique() {
        let mut n = ResizeNotifier::new();
        let a = n.observe(ObserveTarget::Stage);
        let b = n.observe(ObserveTarget::Stage);
        assert_ne!(a.id(), b.id());
        n.unobserve(a);
        assert!(n.is_observed(&ObserveTarget::Stage));
        assert_eq!(b.target(), &ObserveTarget::Stage);
    }
}
