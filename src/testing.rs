// SPDX-License-Identifier: MPL-2.0
//! Deterministic test doubles for the host traits.
//!
//! These mocks let the whole control layer run with no real media
//! element, window, or clock behind it. They are published (not gated
//! behind `cfg(test)`) so downstream hosts can drive the same doubles
//! from their own integration tests.
//!
//! Dispatch is synchronous: `MockMedia::dispatch` and
//! `MockInputSource::emit` call the registered handlers before
//! returning, which keeps test assertions free of any waiting.

use crate::error::HostError;
use crate::events::{EventHub, PlayerEvent, SubscriberId};
use crate::host::{
    CueEdge, Dimensions, InputHandler, InputSignal, InputSource, ListenerHandle, MediaElement,
    MediaSignal, MediaSignalKind, SignalHandler, TextCue, TextTrack, TimeRange, ViewportHost,
};
use crate::player::Player;
use crate::timing::Clock;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

// --------------------------------------------------------------------
// Media element
// --------------------------------------------------------------------

/// In-memory media element with listener accounting.
///
/// Commands mimic a compliant host: `request_play` dispatches the native
/// play signal synchronously (unless playback was denied via
/// [`deny_play`](MockMedia::deny_play)), and volume or mute writes
/// dispatch a volume-change signal.
pub struct MockMedia {
    current_time: Cell<f64>,
    duration: Cell<f64>,
    volume: Cell<f64>,
    muted: Cell<bool>,
    buffered: RefCell<Vec<TimeRange>>,
    readiness_level: Cell<u8>,
    dimensions: Cell<Dimensions>,
    tracks: RefCell<Vec<Rc<dyn TextTrack>>>,
    captions_hidden: Cell<bool>,
    play_denial: RefCell<Option<String>>,
    next_handle: Cell<u64>,
    listeners: RefCell<Vec<(ListenerHandle, MediaSignalKind, SignalHandler)>>,
}

impl MockMedia {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            current_time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            volume: Cell::new(1.0),
            muted: Cell::new(false),
            buffered: RefCell::new(Vec::new()),
            readiness_level: Cell::new(0),
            dimensions: Cell::new(Dimensions::default()),
            tracks: RefCell::new(Vec::new()),
            captions_hidden: Cell::new(false),
            play_denial: RefCell::new(None),
            next_handle: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Makes subsequent `request_play` calls fail with `reason`.
    pub fn deny_play(&self, reason: &str) {
        *self.play_denial.borrow_mut() = Some(reason.to_string());
    }

    pub fn set_duration(&self, seconds: f64) {
        self.duration.set(seconds);
    }

    pub fn set_readiness_level(&self, level: u8) {
        self.readiness_level.set(level);
    }

    pub fn set_buffered(&self, ranges: Vec<TimeRange>) {
        *self.buffered.borrow_mut() = ranges;
    }

    pub fn set_dimensions(&self, dimensions: Dimensions) {
        self.dimensions.set(dimensions);
    }

    pub fn set_tracks(&self, tracks: Vec<Rc<MockTrack>>) {
        *self.tracks.borrow_mut() = tracks
            .into_iter()
            .map(|track| track as Rc<dyn TextTrack>)
            .collect();
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    #[must_use]
    pub fn native_captions_hidden(&self) -> bool {
        self.captions_hidden.get()
    }

    /// Invokes every handler registered for the signal's kind.
    pub fn dispatch(&self, signal: &MediaSignal) {
        let kind = signal.kind();
        let handlers: Vec<SignalHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(signal);
        }
    }
}

impl MediaElement for MockMedia {
    fn request_play(&self) -> Result<(), HostError> {
        if let Some(reason) = self.play_denial.borrow().as_deref() {
            return Err(HostError::new(reason));
        }
        self.dispatch(&MediaSignal::Play);
        Ok(())
    }

    fn request_pause(&self) {
        self.dispatch(&MediaSignal::Pause);
    }

    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        self.current_time.set(seconds);
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn volume(&self) -> f64 {
        self.volume.get()
    }

    fn set_volume(&self, value: f64) {
        self.volume.set(value.clamp(0.0, 1.0));
        self.dispatch(&MediaSignal::VolumeChange);
    }

    fn is_muted(&self) -> bool {
        self.muted.get()
    }

    fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
        self.dispatch(&MediaSignal::VolumeChange);
    }

    fn buffered(&self) -> Vec<TimeRange> {
        self.buffered.borrow().clone()
    }

    fn readiness_level(&self) -> u8 {
        self.readiness_level.get()
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions.get()
    }

    fn text_tracks(&self) -> Vec<Rc<dyn TextTrack>> {
        self.tracks.borrow().clone()
    }

    fn hide_native_captions(&self) {
        self.captions_hidden.set(true);
    }

    fn subscribe(&self, kind: MediaSignalKind, handler: SignalHandler) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_handle.get());
        self.next_handle.set(self.next_handle.get() + 1);
        self.listeners.borrow_mut().push((handle, kind, handler));
        handle
    }

    fn unsubscribe(&self, handle: ListenerHandle) {
        self.listeners.borrow_mut().retain(|(h, _, _)| *h != handle);
    }
}

// --------------------------------------------------------------------
// Text tracks and cues
// --------------------------------------------------------------------

/// Scripted text cue whose enter/exit edges fire on demand.
pub struct MockCue {
    start: f64,
    end: f64,
    text: RefCell<String>,
    next_handle: Cell<u64>,
    listeners: RefCell<Vec<(ListenerHandle, CueEdge, Rc<dyn Fn()>)>>,
}

impl MockCue {
    #[must_use]
    pub fn new(start: f64, end: f64, text: &str) -> Rc<Self> {
        Rc::new(Self {
            start,
            end,
            text: RefCell::new(text.to_string()),
            next_handle: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn fire_enter(&self) {
        self.fire(CueEdge::Enter);
    }

    pub fn fire_exit(&self) {
        self.fire(CueEdge::Exit);
    }

    fn fire(&self, edge: CueEdge) {
        let handlers: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == edge)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler();
        }
    }
}

impl TextCue for MockCue {
    fn start_seconds(&self) -> f64 {
        self.start
    }

    fn end_seconds(&self) -> f64 {
        self.end
    }

    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn subscribe(&self, edge: CueEdge, handler: Rc<dyn Fn()>) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_handle.get());
        self.next_handle.set(self.next_handle.get() + 1);
        self.listeners.borrow_mut().push((handle, edge, handler));
        handle
    }

    fn unsubscribe(&self, handle: ListenerHandle) {
        self.listeners.borrow_mut().retain(|(h, _, _)| *h != handle);
    }
}

/// Fixed list of [`MockCue`]s with track metadata.
pub struct MockTrack {
    label: String,
    language: String,
    cues: Vec<Rc<MockCue>>,
}

impl MockTrack {
    #[must_use]
    pub fn new(label: &str, language: &str, cues: Vec<Rc<MockCue>>) -> Rc<Self> {
        Rc::new(Self {
            label: label.to_string(),
            language: language.to_string(),
            cues,
        })
    }

    /// The cue at `index`. Panics on an out-of-range index, which in a
    /// test means the fixture is wrong.
    #[must_use]
    pub fn cue(&self, index: usize) -> &Rc<MockCue> {
        &self.cues[index]
    }

    /// Listeners currently attached across all cues.
    #[must_use]
    pub fn total_listener_count(&self) -> usize {
        self.cues.iter().map(|cue| cue.listener_count()).sum()
    }
}

impl TextTrack for MockTrack {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn language(&self) -> String {
        self.language.clone()
    }

    fn cues(&self) -> Vec<Rc<dyn TextCue>> {
        self.cues
            .iter()
            .map(|cue| Rc::clone(cue) as Rc<dyn TextCue>)
            .collect()
    }
}

// --------------------------------------------------------------------
// Input and viewport
// --------------------------------------------------------------------

/// Input source whose signals are emitted by the test itself.
pub struct MockInputSource {
    next_handle: Cell<u64>,
    listeners: RefCell<Vec<(ListenerHandle, InputHandler)>>,
}

impl MockInputSource {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            next_handle: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn emit(&self, signal: &InputSignal) {
        let handlers: Vec<InputHandler> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(signal);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl InputSource for MockInputSource {
    fn subscribe(&self, handler: InputHandler) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_handle.get());
        self.next_handle.set(self.next_handle.get() + 1);
        self.listeners.borrow_mut().push((handle, handler));
        handle
    }

    fn unsubscribe(&self, handle: ListenerHandle) {
        self.listeners.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

/// Viewport that counts fullscreen requests instead of honoring them.
///
/// Like a real host, a granted request does not flip the fullscreen
/// flag by itself; tests confirm the transition by emitting a
/// fullscreen-change input signal, the same way a browser would.
pub struct MockViewport {
    fullscreen: Cell<bool>,
    deny: Cell<bool>,
    enter_requests: Cell<u32>,
    exit_requests: Cell<u32>,
    window_size: Cell<Dimensions>,
    screen_size: Cell<Dimensions>,
}

impl MockViewport {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            fullscreen: Cell::new(false),
            deny: Cell::new(false),
            enter_requests: Cell::new(0),
            exit_requests: Cell::new(0),
            window_size: Cell::new(Dimensions {
                width: 1280,
                height: 720,
            }),
            screen_size: Cell::new(Dimensions {
                width: 1920,
                height: 1080,
            }),
        })
    }

    /// Makes subsequent fullscreen-enter requests fail.
    pub fn deny_fullscreen(&self) {
        self.deny.set(true);
    }

    pub fn set_fullscreen(&self, active: bool) {
        self.fullscreen.set(active);
    }

    pub fn set_window_size(&self, size: Dimensions) {
        self.window_size.set(size);
    }

    #[must_use]
    pub fn enter_requests(&self) -> u32 {
        self.enter_requests.get()
    }

    #[must_use]
    pub fn exit_requests(&self) -> u32 {
        self.exit_requests.get()
    }
}

impl ViewportHost for MockViewport {
    fn request_fullscreen_enter(&self) -> Result<(), HostError> {
        self.enter_requests.set(self.enter_requests.get() + 1);
        if self.deny.get() {
            return Err(HostError::new("fullscreen denied"));
        }
        Ok(())
    }

    fn request_fullscreen_exit(&self) {
        self.exit_requests.set(self.exit_requests.get() + 1);
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn window_size(&self) -> Dimensions {
        self.window_size.get()
    }

    fn screen_size(&self) -> Dimensions {
        self.screen_size.get()
    }
}

// --------------------------------------------------------------------
// Clock and event capture
// --------------------------------------------------------------------

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Captures every event emitted on a hub, in order.
pub struct EventRecorder {
    captured: Rc<RefCell<Vec<PlayerEvent>>>,
    id: SubscriberId,
}

impl EventRecorder {
    /// Subscribes a recorder directly on an event hub.
    #[must_use]
    pub fn subscribe(events: &EventHub) -> Self {
        let captured = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&captured);
        let id = events.subscribe(move |event: &PlayerEvent| {
            sink.borrow_mut().push(event.clone());
        });
        Self { captured, id }
    }

    /// Subscribes a recorder on a player's derived event stream.
    #[must_use]
    pub fn subscribe_to_player(player: &Player) -> Self {
        let captured = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&captured);
        let id = player.subscribe(move |event: &PlayerEvent| {
            sink.borrow_mut().push(event.clone());
        });
        Self { captured, id }
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.captured.borrow().clone()
    }

    #[must_use]
    pub fn subscriber_id(&self) -> SubscriberId {
        self.id
    }
}
