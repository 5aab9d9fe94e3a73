#![forbid(unsafe_code)]

//! Monotonic clocks.
//!
//! The layer never reads wall-clock time directly. It asks a [`Clock`] for a
//! monotonic timestamp, so hosts can drive time themselves (WASM, tests) or
//! fall back to [`SystemClock`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Source of monotonic time.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now_mono(&self) -> Duration;
}

/// Clock backed by the platform's monotonic timer.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic monotonic clock controlled by the host.
///
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the layer.
#[derive(Default, Clone)]
pub struct DeterministicClock {
    now: Rc<Cell<Duration>>,
}

impl fmt::Debug for DeterministicClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeterministicClock")
            .field("now", &self.now.get())
            .finish()
    }
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&self, now: Duration) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now.get()
    }
}
