// SPDX-License-Identifier: MPL-2.0
//! Playback facade and its derived-state helpers.

mod facade;
mod readiness;
mod volume;

pub use facade::{PlaybackSnapshot, Player, SubtitleTrackInfo};
pub use readiness::{ReadyState, ReadyTracker, ReadyTransition};
pub use volume::VolumePercent;
