// SPDX-License-Identifier: MPL-2.0
//! Edge-triggered ready/loading derivation.
//!
//! The host reports a numeric readiness level, but no single native event
//! reliably accompanies every level change — stalls, data progress, and
//! time progress can all move it. The tracker is therefore re-sampled on
//! every throughput-relevant signal and emits only on edges, so "ready"
//! and "loading" notifications strictly alternate no matter how often the
//! level is observed.

use std::cell::Cell;

/// Edge produced by one readiness sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyTransition {
    /// Readiness rose above the threshold.
    Ready,
    /// Readiness fell to or below the threshold.
    Loading,
}

/// Level view of readiness, for state snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// No data has ever reached the play-through threshold.
    NotReady,
    /// Was ready once, currently buffering again.
    Loading,
    /// Enough data to play through a brief stall.
    Ready,
}

/// Tracks the ready/loading edge over a stream of readiness samples.
///
/// Starts in the not-ready state, so the first sample above the threshold
/// produces a [`ReadyTransition::Ready`].
#[derive(Debug)]
pub struct ReadyTracker {
    threshold: u8,
    is_ready: Cell<bool>,
    was_ever_ready: Cell<bool>,
}

impl ReadyTracker {
    #[must_use]
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            is_ready: Cell::new(false),
            was_ever_ready: Cell::new(false),
        }
    }

    /// Observes one readiness sample; returns the edge it produced, if
    /// any. Repeated samples on the same side of the threshold return
    /// `None`.
    pub fn observe(&self, level: u8) -> Option<ReadyTransition> {
        let ready = level > self.threshold;
        let was_ready = self.is_ready.replace(ready);
        if ready {
            self.was_ever_ready.set(true);
        }

        match (was_ready, ready) {
            (false, true) => Some(ReadyTransition::Ready),
            (true, false) => Some(ReadyTransition::Loading),
            _ => None,
        }
    }

    /// Last observed readiness.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.is_ready.get()
    }

    /// Level view for state snapshots.
    #[must_use]
    pub fn state(&self) -> ReadyState {
        if self.is_ready.get() {
            ReadyState::Ready
        } else if self.was_ever_ready.get() {
            ReadyState::Loading
        } else {
            ReadyState::NotReady
        }
    }
}
