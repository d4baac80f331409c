// SPDX-License-Identifier: MPL-2.0
//! Cue synchronization for one subtitle track.
//!
//! [`CueSynchronizer`] attaches an enter and an exit listener to every cue
//! of a track and forwards their firings to the shared event hub. Cue text
//! is read at fire time, not capture time, so late edits to a cue's payload
//! still surface correctly.
//!
//! Teardown comes in two flavors with deliberately different semantics:
//!
//! * [`remove_cue_listeners`](CueSynchronizer::remove_cue_listeners) emits
//!   one synthetic exit event *before* detaching anything, so a consumer
//!   rendering the current cue clears it even when no natural exit will
//!   ever fire (the track is going away).
//! * `Drop` detaches silently. The owner is being destroyed; there is no
//!   consumer left to notify.

use crate::events::{EventHub, PlayerEvent};
use crate::host::{CueEdge, ListenerHandle, TextCue, TextTrack};
use std::rc::Rc;

struct CueBinding {
    cue: Rc<dyn TextCue>,
    enter: ListenerHandle,
    exit: ListenerHandle,
}

/// Live enter/exit listener set over every cue of one track.
pub struct CueSynchronizer {
    bindings: Vec<CueBinding>,
    events: Rc<EventHub>,
    detached: bool,
}

impl CueSynchronizer {
    /// Binds every cue of `track`, forwarding cue edges to `events`.
    #[must_use]
    pub fn bind(track: Rc<dyn TextTrack>, events: Rc<EventHub>) -> Self {
        let bindings = track
            .cues()
            .into_iter()
            .map(|cue| {
                let enter = {
                    let cue_ref = Rc::clone(&cue);
                    let events = Rc::clone(&events);
                    cue.subscribe(
                        CueEdge::Enter,
                        Rc::new(move || {
                            events.emit(&PlayerEvent::SubtitleEnter(cue_ref.text()));
                        }),
                    )
                };
                let exit = {
                    let events = Rc::clone(&events);
                    cue.subscribe(
                        CueEdge::Exit,
                        Rc::new(move || {
                            events.emit(&PlayerEvent::SubtitleExit);
                        }),
                    )
                };
                CueBinding { cue, enter, exit }
            })
            .collect();

        Self {
            bindings,
            events,
            detached: false,
        }
    }

    /// Number of cues currently bound.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Tears down the listener set, emitting one synthetic exit first so
    /// any on-screen cue text is cleared. The exit fires even for a track
    /// with no cues. Idempotent: a second call does nothing.
    pub fn remove_cue_listeners(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.events.emit(&PlayerEvent::SubtitleExit);
        self.detach_all();
    }

    fn detach_all(&mut self) {
        for binding in self.bindings.drain(..) {
            binding.cue.unsubscribe(binding.enter);
            binding.cue.unsubscribe(binding.exit);
        }
    }
}

impl Drop for CueSynchronizer {
    fn drop(&mut self) {
        // Silent: no synthetic exit when the whole synchronizer goes away
        // without an explicit teardown request.
        self.detach_all();
    }
}

impl std::fmt::Debug for CueSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueSynchronizer")
            .field("binding_count", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EventRecorder, MockCue, MockTrack};

    fn track_with_two_cues() -> Rc<MockTrack> {
        MockTrack::new(
            "English",
            "en",
            vec![
                MockCue::new(0.0, 2.0, "first line"),
                MockCue::new(3.0, 5.0, "second line"),
            ],
        )
    }

    #[test]
    fn bind_installs_enter_and_exit_per_cue() {
        let track = track_with_two_cues();
        let events = Rc::new(EventHub::new());

        let synchronizer = CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        assert_eq!(synchronizer.binding_count(), 2);
        assert_eq!(track.total_listener_count(), 4);
        assert_eq!(track.cue(0).listener_count(), 2);
    }

    #[test]
    fn cue_edges_forward_to_events() {
        let track = track_with_two_cues();
        let events = Rc::new(EventHub::new());
        let recorder = EventRecorder::subscribe(&events);
        let _synchronizer =
            CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        track.cue(0).fire_enter();
        track.cue(0).fire_exit();
        track.cue(1).fire_enter();

        assert_eq!(
            recorder.events(),
            vec![
                PlayerEvent::SubtitleEnter("first line".to_string()),
                PlayerEvent::SubtitleExit,
                PlayerEvent::SubtitleEnter("second line".to_string()),
            ]
        );
    }

    #[test]
    fn cue_text_is_read_at_fire_time() {
        let track = track_with_two_cues();
        let events = Rc::new(EventHub::new());
        let recorder = EventRecorder::subscribe(&events);
        let _synchronizer =
            CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        track.cue(0).set_text("edited line");
        track.cue(0).fire_enter();

        assert_eq!(
            recorder.events(),
            vec![PlayerEvent::SubtitleEnter("edited line".to_string())]
        );
    }

    #[test]
    fn remove_emits_synthetic_exit_before_detaching() {
        let track = track_with_two_cues();
        let events = Rc::new(EventHub::new());
        let recorder = EventRecorder::subscribe(&events);
        let mut synchronizer =
            CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        synchronizer.remove_cue_listeners();

        assert_eq!(recorder.events(), vec![PlayerEvent::SubtitleExit]);
        assert_eq!(track.total_listener_count(), 0);
        assert_eq!(synchronizer.binding_count(), 0);

        // Cues firing after removal are inert.
        track.cue(0).fire_enter();
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let track = track_with_two_cues();
        let events = Rc::new(EventHub::new());
        let recorder = EventRecorder::subscribe(&events);
        let mut synchronizer =
            CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        synchronizer.remove_cue_listeners();
        synchronizer.remove_cue_listeners();

        // Only the first call emits.
        assert_eq!(recorder.events(), vec![PlayerEvent::SubtitleExit]);
    }

    #[test]
    fn drop_detaches_without_emitting() {
        let track = track_with_two_cues();
        let events = Rc::new(EventHub::new());
        let recorder = EventRecorder::subscribe(&events);
        let synchronizer =
            CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        drop(synchronizer);

        assert!(recorder.events().is_empty());
        assert_eq!(track.total_listener_count(), 0);
    }

    #[test]
    fn empty_track_binds_nothing_but_teardown_still_clears() {
        let track = MockTrack::new("Empty", "en", vec![]);
        let events = Rc::new(EventHub::new());
        let recorder = EventRecorder::subscribe(&events);
        let mut synchronizer =
            CueSynchronizer::bind(Rc::clone(&track) as Rc<dyn TextTrack>, events);

        assert_eq!(synchronizer.binding_count(), 0);
        synchronizer.remove_cue_listeners();
        assert_eq!(recorder.events(), vec![PlayerEvent::SubtitleExit]);
    }
}
