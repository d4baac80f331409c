// SPDX-License-Identifier: MPL-2.0
//! Derived playback event stream.
//!
//! The Playback Facade synthesizes [`PlayerEvent`]s from raw host signals
//! and broadcasts them through an [`EventHub`]: a small single-threaded
//! publish/subscribe registry with handle-based unsubscribe and a
//! `clear()` used during teardown.
//!
//! Emission is re-entrancy safe: subscribers are cloned out of the
//! registry before dispatch, so a handler may subscribe, unsubscribe, or
//! issue facade commands (which may emit further events) from inside its
//! own callback.

use crate::error::MediaFault;
use crate::host::{Dimensions, TimeRange};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Position payload carried by time-bearing events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInfo {
    /// Current playback position in seconds.
    pub current: f64,
    /// Total duration in seconds, 0 when still unknown.
    pub total: f64,
}

/// One derived event emitted by the Playback Facade.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Readiness rose above the play-through threshold. Strictly
    /// alternates with [`PlayerEvent::Loading`].
    Ready,
    /// Readiness fell below the play-through threshold.
    Loading,

    /// Passthrough media lifecycle notifications.
    LoadStart,
    LoadedData,
    Abort,
    CanPlay,
    CanPlayThrough,
    Waiting,

    Play,
    Playing,
    Pause,

    /// Playback position progressed.
    Time(TimeInfo),
    /// An explicit seek command completed.
    Seek(TimeInfo),
    /// Duration became known (metadata loaded).
    Duration(TimeInfo),

    /// Derived volume percentage: 0 when muted, else the rounded percent.
    Volume(u8),
    /// Buffered ranges changed.
    Buffer(Vec<TimeRange>),
    /// Intrinsic video dimensions became known.
    Dimensions(Dimensions),

    /// A subtitle cue became active; carries its text payload.
    SubtitleEnter(String),
    /// The active subtitle cue ended, or the display must clear.
    SubtitleExit,

    /// Native media fault, passed through unmodified.
    Error(MediaFault),
}

/// Identifies one subscriber for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Subscriber = Rc<dyn Fn(&PlayerEvent)>;

/// Single-threaded broadcast registry for [`PlayerEvent`]s.
#[derive(Default)]
pub struct EventHub {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriberId, Subscriber)>>,
}

impl EventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber and returns its removal handle.
    pub fn subscribe(&self, handler: impl Fn(&PlayerEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Removes one subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    /// Removes every subscriber. Used by facade teardown.
    pub fn clear(&self) {
        self.subscribers.borrow_mut().clear();
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Broadcasts `event` to every current subscriber.
    ///
    /// The subscriber list is snapshotted first, so mutations performed by
    /// handlers take effect for the next emission, not this one.
    pub fn emit(&self, event: &PlayerEvent) {
        let snapshot: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
