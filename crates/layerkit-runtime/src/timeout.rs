#![forbid(unsafe_code)]

//! Transition safety net.
//!
//! Completion signals from a rendering surface are not guaranteed to
//! arrive. [`TransitionTimer`] is armed with the transition's declared
//! duration and keyed by its `transition_id`; once the deadline passes the
//! layer treats that transition as over, whether or not the hand-off
//! reported back.
//!
//! The timer holds no callback. It is a deadline compared against a
//! monotonic timestamp supplied by the caller, so it is driven entirely by
//! the layer's [`Clock`](layerkit_core::clock::Clock).

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    transition_id: u64,
    started: Duration,
    duration: Duration,
}

/// Deadline for the transition in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionTimer {
    armed: Option<Armed>,
}

impl TransitionTimer {
    /// Arm for `transition_id`, replacing any earlier deadline.
    pub fn arm(&mut self, transition_id: u64, now: Duration, duration: Duration) {
        self.armed = Some(Armed {
            transition_id,
            started: now,
            duration,
        });
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Transition the timer is keyed to.
    pub fn transition_id(&self) -> Option<u64> {
        self.armed.map(|a| a.transition_id)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self, now: Duration) -> bool {
        self.armed
            .is_some_and(|a| now.saturating_sub(a.started) >= a.duration)
    }

    /// Time left before the deadline; `None` when disarmed.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.armed
            .map(|a| a.duration.saturating_sub(now.saturating_sub(a.started)))
    }

    /// Disarm and return the transition id if the deadline has passed.
    pub fn take_expired(&mut self, now: Duration) -> Option<u64> {
        if self.is_expired(now) {
            self.armed.take().map(|a| a.transition_id)
        } else {
            None
        }
    }
}
