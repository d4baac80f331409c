// SPDX-License-Identifier: MPL-2.0
//! Explicit, cancellable deferred work.
//!
//! The input state machine owes its correctness to two debounced streams
//! (mouse-movement sampling and the controls hide timer) being
//! independently cancellable on teardown. Rather than ambient closures,
//! deferred work is modeled as plain timer values polled from the host's
//! event loop via `tick(now)`: arming, firing, and cancellation are all
//! first-class, testable operations, and a cancelled timer can never fire
//! after its owner is gone.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of the current instant.
///
/// Production code uses [`SystemClock`]; tests drive a manual clock so
/// debounce windows elapse deterministically.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Trailing-edge debounce timer.
///
/// Every `arm` pushes the deadline to `now + delay`; the timer fires at
/// most once per armed period, when `fire_if_due` is polled past the
/// deadline. `cancel` discards any pending deadline.
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Cell<Option<Instant>>,
}

impl DebounceTimer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: Cell::new(None),
        }
    }

    /// Starts, or restarts, the debounce window.
    pub fn arm(&self, now: Instant) {
        self.deadline.set(Some(now + self.delay));
    }

    /// Discards any pending deadline.
    pub fn cancel(&self) {
        self.deadline.set(None);
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.get().is_some()
    }

    /// Returns true exactly once per armed period, when polled at or past
    /// the deadline. Disarms on fire.
    pub fn fire_if_due(&self, now: Instant) -> bool {
        match self.deadline.get() {
            Some(deadline) if now >= deadline => {
                self.deadline.set(None);
                true
            }
            _ => false,
        }
    }
}

/// Debounced mouse-movement sampler.
///
/// Raw mouse positions arrive at display rate; the sampler records the
/// latest pending position and, once per debounce window, compares it to
/// the last sampled one. Only displacement beyond `threshold_px` counts
/// as significant movement — sub-pixel jitter never wakes the controls.
#[derive(Debug)]
pub struct MouseSampler {
    timer: DebounceTimer,
    threshold_px: f64,
    last: Cell<(f64, f64)>,
    pending: Cell<Option<(f64, f64)>>,
}

impl MouseSampler {
    #[must_use]
    pub fn new(interval: Duration, threshold_px: f64) -> Self {
        Self {
            timer: DebounceTimer::new(interval),
            threshold_px,
            last: Cell::new((0.0, 0.0)),
            pending: Cell::new(None),
        }
    }

    /// Records a raw mouse position and (re)arms the sample window.
    pub fn record(&self, x: f64, y: f64, now: Instant) {
        self.pending.set(Some((x, y)));
        self.timer.arm(now);
    }

    /// Polls the sample window; returns true when the debounced sample
    /// shows significant movement since the previous sample.
    pub fn sample_if_due(&self, now: Instant) -> bool {
        if !self.timer.fire_if_due(now) {
            return false;
        }
        let Some((x, y)) = self.pending.take() else {
            return false;
        };
        let (last_x, last_y) = self.last.get();
        self.last.set((x, y));

        let dx = x - last_x;
        let dy = y - last_y;
        (dx * dx + dy * dy).sqrt() > self.threshold_px
    }

    /// Discards pending samples and disarms the window.
    pub fn cancel(&self) {
        self.timer.cancel();
        self.pending.set(None);
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }
}
