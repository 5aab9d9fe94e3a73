#![forbid(unsafe_code)]

//! Single-threaded deferred completions.
//!
//! A [`Deferred`] is the read side of a one-shot completion signal and a
//! [`Resolver`] the write side. Layouts hand a `Deferred` back from
//! asynchronous operations (frame loading, animated hand-offs) and resolve it
//! later from their own tick; the layer polls it. Nothing blocks and nothing
//! crosses threads.
//!
//! # Invariants
//!
//! 1. Resolution is one-way: once resolved, a `Deferred` stays resolved.
//! 2. Dropping a `Resolver` without resolving leaves the `Deferred` pending
//!    forever; callers rely on their own timeout for that case.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Read side of a one-shot completion.
#[derive(Clone)]
pub struct Deferred {
    done: Rc<Cell<bool>>,
}

/// Write side of a one-shot completion.
pub struct Resolver {
    done: Rc<Cell<bool>>,
}

impl Deferred {
    /// A completion that is already resolved.
    pub fn resolved() -> Self {
        Self {
            done: Rc::new(Cell::new(true)),
        }
    }

    /// A pending completion together with the resolver that finishes it.
    pub fn pending() -> (Self, Resolver) {
        let done = Rc::new(Cell::new(false));
        (
            Self {
                done: Rc::clone(&done),
            },
            Resolver { done },
        )
    }

    /// Whether the completion has been signalled.
    pub fn is_resolved(&self) -> bool {
        self.done.get()
    }
}

impl Resolver {
    /// Signal completion.
    pub fn resolve(self) {
        self.done.set(true);
    }

    /// Whether a reader still holds the matching [`Deferred`].
    pub fn is_observed(&self) -> bool {
        Rc::strong_count(&self.done) > 1
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.done.get())
            .finish()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("resolved", &self.done.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_signals_all_clones() {
        let (deferred, resolver) = Deferred::pending();
        let other = deferred.clone();
        assert!(!deferred.is_resolved());
        assert!(resolver.is_observed());
        resolver.resolve();
        assert!(deferred.is_resolved());
        assert!(other.is_resolved());
    }

    #[test]
    fn dropped_resolver_leaves_pending() {
        let (deferred, resolver) = Deferred::pending();
        drop(resolver);
        assert!(!deferred.is_resolved());
        assert!(Deferred::resolved().is_resolved());
    }

    #[test]
    fn resolver_sees_dropped_reader() {
        let (deferred, resolver) = Deferred::pending();
        drop(deferred);
        assert!(!resolver.is_observed());
    }
}
