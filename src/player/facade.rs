// SPDX-License-Identifier: MPL-2.0
//! The Playback Facade.
//!
//! [`Player`] is the single point of truth for playback state. It wraps a
//! host media element, subscribes to its raw signals, and turns them into
//! the typed [`PlayerEvent`] stream while exposing imperative commands
//! (play, pause, seek, mute, volume, subtitle track selection).
//!
//! The facade owns at most one [`CueSynchronizer`] at a time: switching
//! subtitle tracks tears the old one down — synthetic exit first, then
//! listener detach — before the replacement installs, so a consumer never
//! observes two tracks bound at once.
//!
//! Everything is single-threaded: commands take `&self`, internal state
//! sits in `Cell`s shared with the signal handler, and derived events are
//! emitted only after internal borrows are released so a subscriber may
//! issue commands re-entrantly.

use crate::config::Tunables;
use crate::events::{EventHub, PlayerEvent, SubscriberId, TimeInfo};
use crate::host::{Dimensions, ListenerHandle, MediaElement, MediaSignal, MediaSignalKind, TimeRange};
use crate::player::readiness::{ReadyState, ReadyTracker, ReadyTransition};
use crate::player::volume::VolumePercent;
use crate::subtitles::CueSynchronizer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Metadata for one subtitle track, for menu display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrackInfo {
    pub index: usize,
    pub label: String,
    pub language: String,
}

/// Point-in-time copy of the derived playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub ready_state: ReadyState,
    pub is_playing: bool,
    pub is_muted: bool,
    /// 0 when muted, else the rounded percentage of the underlying volume.
    pub volume_percent: u8,
    pub current_time: f64,
    pub total_duration: f64,
    pub buffered: Vec<TimeRange>,
}

/// State shared between the facade and its installed signal handler.
struct SharedState {
    is_playing: Cell<bool>,
    ready: ReadyTracker,
}

/// Playback facade over one host media element.
///
/// Dropping the facade detaches every listener it installed; no handler
/// fires after teardown.
pub struct Player {
    media: Rc<dyn MediaElement>,
    events: Rc<EventHub>,
    state: Rc<SharedState>,
    listeners: RefCell<Vec<ListenerHandle>>,
    subtitles: RefCell<Option<CueSynchronizer>>,
    active_track: Cell<Option<usize>>,
}

impl Player {
    /// Wraps `media` with default tunables, installing one listener per
    /// named native signal.
    #[must_use]
    pub fn new(media: Rc<dyn MediaElement>) -> Self {
        Self::with_tunables(media, &Tunables::default())
    }

    /// Wraps `media`, taking the readiness threshold from `tunables`.
    #[must_use]
    pub fn with_tunables(media: Rc<dyn MediaElement>, tunables: &Tunables) -> Self {
        let events = Rc::new(EventHub::new());
        let state = Rc::new(SharedState {
            is_playing: Cell::new(false),
            ready: ReadyTracker::new(tunables.ready_level_threshold),
        });

        let handler: Rc<dyn Fn(&MediaSignal)> = {
            let media = Rc::clone(&media);
            let events = Rc::clone(&events);
            let state = Rc::clone(&state);
            Rc::new(move |signal| handle_signal(&media, &state, &events, signal))
        };

        let listeners = MediaSignalKind::ALL
            .iter()
            .map(|&kind| media.subscribe(kind, Rc::clone(&handler)))
            .collect();

        Self {
            media,
            events,
            state,
            listeners: RefCell::new(listeners),
            subtitles: RefCell::new(None),
            active_track: Cell::new(None),
        }
    }

    // ----------------------------------------------------------------
    // Derived event stream
    // ----------------------------------------------------------------

    /// Registers a subscriber on the derived event stream.
    pub fn subscribe(&self, handler: impl Fn(&PlayerEvent) + 'static) -> SubscriberId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.events.unsubscribe(id);
    }

    // ----------------------------------------------------------------
    // Transport commands
    // ----------------------------------------------------------------

    /// Requests playback. Host refusal (autoplay policy) is logged as a
    /// warning and otherwise ignored; the play event arrives
    /// asynchronously via the native signal when the host complies.
    pub fn play(&self) {
        if let Err(err) = self.media.request_play() {
            log::warn!("play request rejected: {err}");
        }
    }

    pub fn pause(&self) {
        self.media.request_pause();
    }

    /// Pauses when the last known state is playing, else plays.
    pub fn toggle(&self) {
        if self.state.is_playing.get() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Last known playing state, derived from native play/pause signals.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing.get()
    }

    /// Seeks to an absolute position in seconds and emits a seek event.
    ///
    /// Non-finite input is a silent no-op: no state change, no event.
    pub fn seek_to(&self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        self.media.set_current_time(seconds);
        self.events.emit(&PlayerEvent::Seek(TimeInfo {
            current: self.media.current_time(),
            total: self.duration(),
        }));
    }

    // ----------------------------------------------------------------
    // Volume commands
    // ----------------------------------------------------------------

    pub fn mute(&self) {
        self.media.set_muted(true);
    }

    pub fn unmute(&self) {
        self.media.set_muted(false);
    }

    pub fn toggle_mute(&self) {
        if self.is_muted() {
            self.unmute();
        } else {
            self.mute();
        }
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.media.is_muted()
    }

    /// Sets the volume from a percentage, clamping to [0, 100]. Does not
    /// touch the mute flag. NaN input is a silent no-op.
    pub fn change_volume(&self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        self.media
            .set_volume(VolumePercent::from_input(percent).to_scalar());
    }

    /// Derived volume: 0 whenever muted, regardless of the underlying
    /// value, else the rounded percentage.
    #[must_use]
    pub fn volume_percent(&self) -> u8 {
        if self.is_muted() {
            return 0;
        }
        VolumePercent::from_scalar(self.media.volume()).value()
    }

    // ----------------------------------------------------------------
    // Read accessors
    // ----------------------------------------------------------------

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    /// Total duration in seconds; 0 while the host still reports NaN.
    #[must_use]
    pub fn duration(&self) -> f64 {
        normalized_duration(&*self.media)
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.media.dimensions()
    }

    /// Copies the full derived playback state.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            ready_state: self.state.ready.state(),
            is_playing: self.is_playing(),
            is_muted: self.is_muted(),
            volume_percent: self.volume_percent(),
            current_time: self.current_time(),
            total_duration: self.duration(),
            buffered: self.media.buffered(),
        }
    }

    // ----------------------------------------------------------------
    // Subtitle tracks
    // ----------------------------------------------------------------

    /// Track metadata in host order, for menu display.
    #[must_use]
    pub fn subtitle_tracks(&self) -> Vec<SubtitleTrackInfo> {
        self.media
            .text_tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| SubtitleTrackInfo {
                index,
                label: track.label(),
                language: track.language(),
            })
            .collect()
    }

    /// Index of the currently synchronized track, if any.
    #[must_use]
    pub fn active_subtitle_track(&self) -> Option<usize> {
        self.active_track.get()
    }

    /// Switches cue synchronization to the track at `index`.
    ///
    /// The previous synchronizer (if any) is fully torn down first: one
    /// synthetic subtitle-exit, then every cue listener detached. Only
    /// then do the new track's bindings install, so the switch is atomic
    /// from the consumer's point of view. An unknown index logs a warning
    /// and leaves no track active.
    pub fn set_active_subtitle_track(&self, index: usize) {
        self.teardown_synchronizer();

        let tracks = self.media.text_tracks();
        match tracks.get(index) {
            Some(track) => {
                let synchronizer = CueSynchronizer::bind(Rc::clone(track), Rc::clone(&self.events));
                log::debug!(
                    "subtitle track {index} active, {} cues bound",
                    synchronizer.binding_count()
                );
                *self.subtitles.borrow_mut() = Some(synchronizer);
                self.active_track.set(Some(index));
            }
            None => {
                log::warn!("subtitle track {index} does not exist; no track active");
                self.active_track.set(None);
            }
        }
    }

    /// Deactivates subtitle synchronization entirely.
    pub fn clear_subtitle_track(&self) {
        self.teardown_synchronizer();
        self.active_track.set(None);
    }

    fn teardown_synchronizer(&self) {
        // Take the synchronizer out before teardown so the synthetic exit
        // is emitted with no RefCell borrow outstanding.
        let previous = self.subtitles.borrow_mut().take();
        if let Some(mut synchronizer) = previous {
            synchronizer.remove_cue_listeners();
        }
    }

    // ----------------------------------------------------------------
    // Teardown
    // ----------------------------------------------------------------

    /// Releases every listener installed on the media element and on the
    /// active track, and drops all event subscribers. Idempotent; also
    /// runs on `Drop`.
    pub fn detach(&self) {
        for handle in self.listeners.borrow_mut().drain(..) {
            self.media.unsubscribe(handle);
        }
        self.teardown_synchronizer();
        self.active_track.set(None);
        self.events.clear();
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("is_playing", &self.is_playing())
            .field("active_track", &self.active_track.get())
            .finish_non_exhaustive()
    }
}

fn normalized_duration(media: &dyn MediaElement) -> f64 {
    let duration = media.duration();
    if duration.is_finite() {
        duration
    } else {
        0.0
    }
}

/// Translates one raw media signal into derived state and events.
///
/// Readiness is re-sampled on every throughput-relevant signal (stall,
/// data progress, time progress), not just a dedicated readiness event,
/// because the host does not pair level changes with a single event type.
fn handle_signal(
    media: &Rc<dyn MediaElement>,
    state: &SharedState,
    events: &EventHub,
    signal: &MediaSignal,
) {
    match signal {
        MediaSignal::LoadStart => events.emit(&PlayerEvent::LoadStart),
        MediaSignal::LoadedData => events.emit(&PlayerEvent::LoadedData),
        MediaSignal::Abort => events.emit(&PlayerEvent::Abort),
        MediaSignal::Error(fault) => events.emit(&PlayerEvent::Error(fault.clone())),
        MediaSignal::CanPlayThrough => events.emit(&PlayerEvent::CanPlayThrough),
        MediaSignal::CanPlay => {
            emit_ready_edge(media, state, events);
            events.emit(&PlayerEvent::CanPlay);
        }
        MediaSignal::Waiting => {
            emit_ready_edge(media, state, events);
            events.emit(&PlayerEvent::Waiting);
        }
        MediaSignal::Progress => {
            emit_ready_edge(media, state, events);
            events.emit(&PlayerEvent::Buffer(media.buffered()));
        }
        MediaSignal::VolumeChange => {
            let percent = if media.is_muted() {
                0
            } else {
                VolumePercent::from_scalar(media.volume()).value()
            };
            events.emit(&PlayerEvent::Volume(percent));
        }
        MediaSignal::LoadedMetadata => {
            media.hide_native_captions();
            events.emit(&PlayerEvent::Dimensions(media.dimensions()));
            events.emit(&PlayerEvent::Duration(TimeInfo {
                current: media.current_time(),
                total: normalized_duration(&**media),
            }));
        }
        MediaSignal::Play => {
            state.is_playing.set(true);
            events.emit(&PlayerEvent::Play);
        }
        MediaSignal::Playing => {
            state.is_playing.set(true);
            events.emit(&PlayerEvent::Playing);
        }
        MediaSignal::Pause => {
            state.is_playing.set(false);
            events.emit(&PlayerEvent::Pause);
        }
        MediaSignal::TimeUpdate => {
            emit_ready_edge(media, state, events);
            events.emit(&PlayerEvent::Time(TimeInfo {
                current: media.current_time(),
                total: normalized_duration(&**media),
            }));
        }
    }
}

fn emit_ready_edge(media: &Rc<dyn MediaElement>, state: &SharedState, events: &EventHub) {
    match state.ready.observe(media.readiness_level()) {
        Some(ReadyTransition::Ready) => events.emit(&PlayerEvent::Ready),
        Some(ReadyTransition::Loading) => events.emit(&PlayerEvent::Loading),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EventRecorder, MockCue, MockMedia, MockTrack};
    use crate::test_utils::assert_abs_diff_eq;

    fn player_with_media() -> (Rc<MockMedia>, Player) {
        let media = MockMedia::new();
        let player = Player::new(Rc::clone(&media) as Rc<dyn MediaElement>);
        (media, player)
    }

    #[test]
    fn new_player_installs_all_signal_listeners() {
        let (media, _player) = player_with_media();
        assert_eq!(media.listener_count(), MediaSignalKind::ALL.len());
    }

    #[test]
    fn detach_removes_every_media_listener() {
        let (media, player) = player_with_media();
        player.detach();
        assert_eq!(media.listener_count(), 0);
    }

    #[test]
    fn drop_removes_every_media_listener() {
        let (media, player) = player_with_media();
        drop(player);
        assert_eq!(media.listener_count(), 0);
    }

    #[test]
    fn no_events_after_detach() {
        let (media, player) = player_with_media();
        let recorder = EventRecorder::subscribe_to_player(&player);

        player.detach();
        media.dispatch(&MediaSignal::Play);
        media.dispatch(&MediaSignal::TimeUpdate);

        assert!(recorder.events().is_empty());
    }

    #[test]
    fn toggle_plays_when_paused_and_pauses_when_playing() {
        let (_media, player) = player_with_media();

        assert!(!player.is_playing());
        player.toggle();
        // MockMedia dispatches the native play signal synchronously.
        assert!(player.is_playing());

        player.toggle();
        assert!(!player.is_playing());
    }

    #[test]
    fn rejected_play_request_is_swallowed() {
        let (media, player) = player_with_media();
        media.deny_play("autoplay blocked");

        player.play();

        assert!(!player.is_playing());
    }

    #[test]
    fn seek_emits_event_with_current_and_total() {
        let (media, player) = player_with_media();
        media.set_duration(200.0);
        let recorder = EventRecorder::subscribe_to_player(&player);

        player.seek_to(42.0);

        assert_eq!(media.current_time(), 42.0);
        assert_eq!(
            recorder.events(),
            vec![PlayerEvent::Seek(TimeInfo {
                current: 42.0,
                total: 200.0
            })]
        );
    }

    #[test]
    fn seek_to_nan_is_a_silent_no_op() {
        let (media, player) = player_with_media();
        media.set_current_time(5.0);
        let recorder = EventRecorder::subscribe_to_player(&player);

        player.seek_to(f64::NAN);
        player.seek_to(f64::INFINITY);

        assert_eq!(media.current_time(), 5.0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn change_volume_clamps_and_rounds() {
        let (media, player) = player_with_media();

        player.change_volume(57.0);
        assert_abs_diff_eq!(media.volume(), 0.57);
        assert_eq!(player.volume_percent(), 57);

        player.change_volume(150.0);
        assert_eq!(player.volume_percent(), 100);

        player.change_volume(-10.0);
        assert_eq!(player.volume_percent(), 0);
    }

    #[test]
    fn volume_reads_zero_while_muted() {
        let (media, player) = player_with_media();

        player.change_volume(80.0);
        player.mute();
        assert_eq!(player.volume_percent(), 0);
        // The underlying value is untouched by mute.
        assert_abs_diff_eq!(media.volume(), 0.8);

        player.unmute();
        assert_eq!(player.volume_percent(), 80);
    }

    #[test]
    fn change_volume_does_not_affect_mute() {
        let (_media, player) = player_with_media();
        player.mute();
        player.change_volume(50.0);
        assert!(player.is_muted());
    }

    #[test]
    fn duration_is_zero_while_unknown() {
        let (media, player) = player_with_media();
        media.set_duration(f64::NAN);
        assert_eq!(player.duration(), 0.0);

        media.set_duration(120.0);
        assert_eq!(player.duration(), 120.0);
    }

    #[test]
    fn ready_and_loading_edges_from_native_signals() {
        let (media, player) = player_with_media();
        let recorder = EventRecorder::subscribe_to_player(&player);

        // Level sequence [2, 2, 4, 4, 2] across assorted signal kinds.
        media.set_readiness_level(2);
        media.dispatch(&MediaSignal::CanPlay);
        media.dispatch(&MediaSignal::Waiting);
        media.set_readiness_level(4);
        media.dispatch(&MediaSignal::Progress);
        media.dispatch(&MediaSignal::TimeUpdate);
        media.set_readiness_level(2);
        media.dispatch(&MediaSignal::Waiting);

        let edges: Vec<_> = recorder
            .events()
            .into_iter()
            .filter(|e| matches!(e, PlayerEvent::Ready | PlayerEvent::Loading))
            .collect();
        assert_eq!(edges, vec![PlayerEvent::Ready, PlayerEvent::Loading]);
    }

    #[test]
    fn configured_readiness_threshold_moves_the_edge() {
        let media = MockMedia::new();
        let tunables = Tunables {
            ready_level_threshold: 1,
            ..Tunables::default()
        };
        let player = Player::with_tunables(Rc::clone(&media) as Rc<dyn MediaElement>, &tunables);
        let recorder = EventRecorder::subscribe_to_player(&player);

        // Level 2 is below the default threshold but above the custom one.
        media.set_readiness_level(2);
        media.dispatch(&MediaSignal::Progress);

        assert!(recorder
            .events()
            .iter()
            .any(|e| matches!(e, PlayerEvent::Ready)));
    }

    #[test]
    fn progress_emits_buffered_ranges() {
        let (media, player) = player_with_media();
        let recorder = EventRecorder::subscribe_to_player(&player);
        media.set_buffered(vec![TimeRange {
            start: 0.0,
            end: 30.0,
        }]);

        media.dispatch(&MediaSignal::Progress);

        assert!(recorder.events().iter().any(|e| matches!(
            e,
            PlayerEvent::Buffer(ranges) if ranges.len() == 1 && ranges[0].end == 30.0
        )));
    }

    #[test]
    fn volume_change_signal_reports_derived_percent() {
        let (media, player) = player_with_media();
        let recorder = EventRecorder::subscribe_to_player(&player);

        player.change_volume(80.0);
        player.mute();

        // MockMedia dispatches VolumeChange for both operations.
        assert_eq!(
            recorder.events(),
            vec![PlayerEvent::Volume(80), PlayerEvent::Volume(0)]
        );
    }

    #[test]
    fn loaded_metadata_reports_dimensions_duration_and_hides_captions() {
        let (media, player) = player_with_media();
        let recorder = EventRecorder::subscribe_to_player(&player);
        media.set_duration(300.0);
        media.set_dimensions(Dimensions {
            width: 1920,
            height: 1080,
        });

        media.dispatch(&MediaSignal::LoadedMetadata);

        assert!(media.native_captions_hidden());
        assert_eq!(
            recorder.events(),
            vec![
                PlayerEvent::Dimensions(Dimensions {
                    width: 1920,
                    height: 1080
                }),
                PlayerEvent::Duration(TimeInfo {
                    current: 0.0,
                    total: 300.0
                }),
            ]
        );
    }

    #[test]
    fn media_fault_passes_through() {
        let (media, player) = player_with_media();
        let recorder = EventRecorder::subscribe_to_player(&player);

        let fault = crate::error::MediaFault::new(Some(3), "decode failed");
        media.dispatch(&MediaSignal::Error(fault.clone()));

        assert_eq!(recorder.events(), vec![PlayerEvent::Error(fault)]);
    }

    #[test]
    fn snapshot_reflects_derived_state() {
        let (media, player) = player_with_media();
        media.set_duration(100.0);
        media.set_readiness_level(4);
        media.dispatch(&MediaSignal::CanPlay);
        player.change_volume(40.0);
        player.play();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.ready_state, ReadyState::Ready);
        assert!(snapshot.is_playing);
        assert!(!snapshot.is_muted);
        assert_eq!(snapshot.volume_percent, 40);
        assert_eq!(snapshot.total_duration, 100.0);
    }

    #[test]
    fn switching_tracks_exits_before_entering_and_leaves_no_stale_listeners() {
        let media = MockMedia::new();
        let track_a = MockTrack::new(
            "English",
            "en",
            vec![MockCue::new(0.0, 2.0, "hello"), MockCue::new(3.0, 5.0, "world")],
        );
        let track_b = MockTrack::new("French", "fr", vec![MockCue::new(0.0, 2.0, "bonjour")]);
        media.set_tracks(vec![Rc::clone(&track_a), Rc::clone(&track_b)]);
        let player = Player::new(Rc::clone(&media) as Rc<dyn MediaElement>);
        let recorder = EventRecorder::subscribe_to_player(&player);

        player.set_active_subtitle_track(0);
        assert_eq!(track_a.total_listener_count(), 4);
        track_a.cue(0).fire_enter();

        player.set_active_subtitle_track(1);

        // Old bindings are gone; new track's are installed.
        assert_eq!(track_a.total_listener_count(), 0);
        assert_eq!(track_b.total_listener_count(), 2);
        assert_eq!(player.active_subtitle_track(), Some(1));

        // Exactly one synthetic exit between A's enter and anything from B.
        assert_eq!(
            recorder.events(),
            vec![
                PlayerEvent::SubtitleEnter("hello".to_string()),
                PlayerEvent::SubtitleExit,
            ]
        );

        // A's cues firing now must be inert.
        track_a.cue(1).fire_enter();
        assert_eq!(recorder.events().len(), 2);
    }

    #[test]
    fn unknown_track_index_clears_active_track() {
        let media = MockMedia::new();
        let track = MockTrack::new("English", "en", vec![MockCue::new(0.0, 1.0, "hi")]);
        media.set_tracks(vec![Rc::clone(&track)]);
        let player = Player::new(Rc::clone(&media) as Rc<dyn MediaElement>);

        player.set_active_subtitle_track(0);
        player.set_active_subtitle_track(7);

        assert_eq!(player.active_subtitle_track(), None);
        assert_eq!(track.total_listener_count(), 0);
    }

    #[test]
    fn clear_subtitle_track_emits_final_exit() {
        let media = MockMedia::new();
        let track = MockTrack::new("English", "en", vec![MockCue::new(0.0, 1.0, "hi")]);
        media.set_tracks(vec![Rc::clone(&track)]);
        let player = Player::new(Rc::clone(&media) as Rc<dyn MediaElement>);
        let recorder = EventRecorder::subscribe_to_player(&player);

        player.set_active_subtitle_track(0);
        player.clear_subtitle_track();

        assert_eq!(recorder.events(), vec![PlayerEvent::SubtitleExit]);
        assert_eq!(player.active_subtitle_track(), None);
        assert_eq!(track.total_listener_count(), 0);
    }

    #[test]
    fn subtitle_tracks_lists_metadata_in_host_order() {
        let media = MockMedia::new();
        media.set_tracks(vec![
            MockTrack::new("English", "en", vec![]),
            MockTrack::new("Deutsch", "de", vec![]),
        ]);
        let player = Player::new(Rc::clone(&media) as Rc<dyn MediaElement>);

        let tracks = player.subtitle_tracks();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].label, "English");
        assert_eq!(tracks[1].language, "de");
        assert_eq!(tracks[1].index, 1);
    }
}
