// SPDX-License-Identifier: MPL-2.0
//! Keyboard-to-command translation.
//!
//! Pure mapping from a key input to a player action, with no state of its
//! own. Playback-affecting keys fire on key release so holding a key does
//! not machine-gun toggles; repeat-friendly keys (arrows) fire on key
//! press so auto-repeat works for scrubbing and volume ramps.

use crate::config::{ARROW_SEEK_STEP_SECS, ARROW_VOLUME_STEP_PERCENT};
use crate::host::{KeyCode, KeyInput, KeyPhase};

/// A command derived from user input, ready for dispatch to the player
/// and viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    TogglePlayback,
    ToggleFullscreen,
    ToggleMute,
    /// Escape: collapse the control overlay immediately.
    HideControls,
    /// Shift+digit N sets the volume to N tenths of full scale.
    SetVolumePercent(u8),
    /// Bare digit N seeks to N tenths of the total duration.
    SeekToFraction(f64),
    /// Relative seek in seconds; negative is backward.
    SeekBy(f64),
    /// Relative volume step in percent; negative is down.
    VolumeBy(i8),
}

/// Maps a key input to its action, or `None` for unrecognized keys.
///
/// Inputs originating from text-entry fields never map to anything; the
/// user is typing, not driving the player.
#[must_use]
pub fn action_for(input: &KeyInput) -> Option<PlayerAction> {
    if input.from_text_entry {
        return None;
    }
    match input.phase {
        KeyPhase::Up => match input.code {
            KeyCode::Space => Some(PlayerAction::TogglePlayback),
            KeyCode::KeyF => Some(PlayerAction::ToggleFullscreen),
            KeyCode::KeyM => Some(PlayerAction::ToggleMute),
            KeyCode::Escape => Some(PlayerAction::HideControls),
            KeyCode::Digit(n) if n <= 9 => {
                if input.shift {
                    Some(PlayerAction::SetVolumePercent(n * 10))
                } else {
                    Some(PlayerAction::SeekToFraction(f64::from(n) / 10.0))
                }
            }
            _ => None,
        },
        KeyPhase::Down => match input.code {
            KeyCode::ArrowLeft => Some(PlayerAction::SeekBy(-ARROW_SEEK_STEP_SECS)),
            KeyCode::ArrowRight => Some(PlayerAction::SeekBy(ARROW_SEEK_STEP_SECS)),
            KeyCode::ArrowUp => Some(PlayerAction::VolumeBy(ARROW_VOLUME_STEP_PERCENT)),
            KeyCode::ArrowDown => Some(PlayerAction::VolumeBy(-ARROW_VOLUME_STEP_PERCENT)),
            _ => None,
        },
    }
}
