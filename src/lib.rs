// SPDX-License-Identifier: MPL-2.0
//! `playdeck` is a headless control layer for a host video player.
//!
//! It wraps a host-provided media element behind the [`host`] traits and
//! derives a typed playback event stream, keeps subtitle cue listeners
//! synchronized across track switches without leaking, and translates
//! keyboard and mouse input into player commands with a debounced
//! auto-hide controls overlay.
//!
//! The crate makes no assumptions about the host beyond the traits in
//! [`host`]: a browser media element, a native pipeline, or the mocks in
//! [`testing`] all work. Everything runs on the host's single UI thread.

#![doc(html_root_url = "https://docs.rs/playdeck/0.1.0")]

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod input;
pub mod player;
pub mod subtitles;
pub mod testing;
pub mod timing;

pub use error::{Error, HostError, MediaFault, Result};
pub use events::{EventHub, PlayerEvent, SubscriberId, TimeInfo};
pub use input::{ControlsVisibility, InputController, PlayerAction};
pub use player::{PlaybackSnapshot, Player, ReadyState, SubtitleTrackInfo};
pub use subtitles::CueSynchronizer;

#[cfg(test)]
mod test_utils;
