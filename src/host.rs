// SPDX-License-Identifier: MPL-2.0
//! Host collaborator contracts.
//!
//! The control layer never touches a real `<video>` element, window, or
//! document. Everything it observes or commands goes through the traits in
//! this module, which a host environment (GUI shell, wasm embedding, test
//! harness) implements. All traits are single-threaded by design: handlers
//! are `Rc<dyn Fn>`, state lives behind interior mutability, and nothing
//! here is `Send`.
//!
//! Every subscription returns a [`ListenerHandle`] so the subscriber can
//! deterministically release it on teardown; relying on ambient teardown
//! ordering is exactly the leak source this design rules out.

use crate::error::{HostError, MediaFault};
use std::rc::Rc;

/// Opaque handle identifying one registered listener on a host object.
///
/// Handles are allocated by the host and are only meaningful for the
/// object that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The named native media events the facade subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSignalKind {
    LoadStart,
    LoadedData,
    Abort,
    Error,
    CanPlayThrough,
    CanPlay,
    Waiting,
    Progress,
    VolumeChange,
    LoadedMetadata,
    Play,
    Playing,
    Pause,
    TimeUpdate,
}

impl MediaSignalKind {
    /// Every signal kind, in the order the facade installs its listeners.
    pub const ALL: [MediaSignalKind; 14] = [
        MediaSignalKind::LoadStart,
        MediaSignalKind::LoadedData,
        MediaSignalKind::Abort,
        MediaSignalKind::Error,
        MediaSignalKind::CanPlayThrough,
        MediaSignalKind::CanPlay,
        MediaSignalKind::Waiting,
        MediaSignalKind::Progress,
        MediaSignalKind::VolumeChange,
        MediaSignalKind::LoadedMetadata,
        MediaSignalKind::Play,
        MediaSignalKind::Playing,
        MediaSignalKind::Pause,
        MediaSignalKind::TimeUpdate,
    ];
}

/// A raw signal dispatched by the media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignal {
    LoadStart,
    LoadedData,
    Abort,
    Error(MediaFault),
    CanPlayThrough,
    CanPlay,
    Waiting,
    Progress,
    VolumeChange,
    LoadedMetadata,
    Play,
    Playing,
    Pause,
    TimeUpdate,
}

impl MediaSignal {
    #[must_use]
    pub fn kind(&self) -> MediaSignalKind {
        match self {
            MediaSignal::LoadStart => MediaSignalKind::LoadStart,
            MediaSignal::LoadedData => MediaSignalKind::LoadedData,
            MediaSignal::Abort => MediaSignalKind::Abort,
            MediaSignal::Error(_) => MediaSignalKind::Error,
            MediaSignal::CanPlayThrough => MediaSignalKind::CanPlayThrough,
            MediaSignal::CanPlay => MediaSignalKind::CanPlay,
            MediaSignal::Waiting => MediaSignalKind::Waiting,
            MediaSignal::Progress => MediaSignalKind::Progress,
            MediaSignal::VolumeChange => MediaSignalKind::VolumeChange,
            MediaSignal::LoadedMetadata => MediaSignalKind::LoadedMetadata,
            MediaSignal::Play => MediaSignalKind::Play,
            MediaSignal::Playing => MediaSignalKind::Playing,
            MediaSignal::Pause => MediaSignalKind::Pause,
            MediaSignal::TimeUpdate => MediaSignalKind::TimeUpdate,
        }
    }
}

/// Callback invoked when a subscribed media signal fires.
pub type SignalHandler = Rc<dyn Fn(&MediaSignal)>;

/// One buffered interval reported by the media element.
///
/// Hosts report these ordered and non-overlapping, with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

/// Intrinsic video dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// The media-element contract the Playback Facade requires.
///
/// Methods take `&self`: a media element is a shared handle with interior
/// mutability on the host side, and facade closures hold clones of it.
/// `request_play` is the one fallible command — hosts may refuse playback
/// (autoplay policy); the refusal is logged by the caller, never thrown.
pub trait MediaElement {
    fn request_play(&self) -> Result<(), HostError>;
    fn request_pause(&self);

    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);

    /// Total duration in seconds. May be NaN while metadata is unknown.
    fn duration(&self) -> f64;

    /// Underlying volume on the host's [0, 1] scale.
    fn volume(&self) -> f64;
    fn set_volume(&self, value: f64);

    fn is_muted(&self) -> bool;
    fn set_muted(&self, muted: bool);

    /// Currently buffered ranges, ordered and non-overlapping.
    fn buffered(&self) -> Vec<TimeRange>;

    /// Numeric readiness level: how much playable data is buffered ahead.
    fn readiness_level(&self) -> u8;

    fn dimensions(&self) -> Dimensions;

    /// The element's subtitle tracks, in host order.
    fn text_tracks(&self) -> Vec<Rc<dyn TextTrack>>;

    /// Disables the host's own caption rendering so the control layer's
    /// subtitle events are the single display path.
    fn hide_native_captions(&self);

    fn subscribe(&self, kind: MediaSignalKind, handler: SignalHandler) -> ListenerHandle;
    fn unsubscribe(&self, handle: ListenerHandle);
}

/// Which edge of a cue's active interval a listener observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueEdge {
    Enter,
    Exit,
}

/// One timed text entry within a track.
pub trait TextCue {
    fn start_seconds(&self) -> f64;
    fn end_seconds(&self) -> f64;

    /// The cue's text payload, read at fire time.
    fn text(&self) -> String;

    fn subscribe(&self, edge: CueEdge, handler: Rc<dyn Fn()>) -> ListenerHandle;
    fn unsubscribe(&self, handle: ListenerHandle);
}

/// A subtitle track: an ordered, possibly-empty cue list plus metadata.
pub trait TextTrack {
    fn label(&self) -> String;
    fn language(&self) -> String;

    /// The track's cues in display order. May be empty when the track has
    /// not been parsed yet.
    fn cues(&self) -> Vec<Rc<dyn TextCue>>;
}

/// Keyboard event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Normalized key identity for the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    KeyF,
    KeyM,
    Escape,
    /// Digit0 through Digit9.
    Digit(u8),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Any key the command table does not recognize.
    Other,
}

/// One keyboard event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: KeyCode,
    pub phase: KeyPhase,
    pub shift: bool,
    /// True when focus sits inside a text input, textarea, or select
    /// control. Such events never reach the command table.
    pub from_text_entry: bool,
}

/// A raw input signal from the host's global sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSignal {
    MouseMove { x: f64, y: f64 },
    Key(KeyInput),
    FullscreenChange { active: bool },
    Resize { width: u32, height: u32 },
}

/// Callback invoked for each input signal.
pub type InputHandler = Rc<dyn Fn(&InputSignal)>;

/// Source of global keyboard/mouse/fullscreen/resize signals.
pub trait InputSource {
    fn subscribe(&self, handler: InputHandler) -> ListenerHandle;
    fn unsubscribe(&self, handle: ListenerHandle);
}

/// Window and fullscreen control surface.
pub trait ViewportHost {
    /// Requests fullscreen. Hosts may refuse; refusal is expected and
    /// non-fatal.
    fn request_fullscreen_enter(&self) -> Result<(), HostError>;
    fn request_fullscreen_exit(&self);
    fn is_fullscreen(&self) -> bool;

    fn window_size(&self) -> Dimensions;
    fn screen_size(&self) -> Dimensions;
}
