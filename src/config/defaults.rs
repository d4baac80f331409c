// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all tunable constants.
//!
//! This module is the single source of truth for the control layer's
//! timing and threshold defaults. Constants are organized by category.
//!
//! # Categories
//!
//! - **Readiness**: buffering-depth threshold for the ready/loading edge
//! - **Controls**: auto-hide timing and mouse sampling for the overlay
//! - **Keyboard**: seek and volume step sizes for arrow keys
//! - **Volume**: percentage bounds

// ==========================================================================
// Readiness Defaults
// ==========================================================================

/// Readiness level above which playback can survive a brief stall.
/// Mirrors the host's "enough data to play through" level.
pub const READY_LEVEL_THRESHOLD: u8 = 3;

// ==========================================================================
// Controls Visibility Defaults
// ==========================================================================

/// Default auto-hide delay for the controls overlay (in seconds).
pub const DEFAULT_HIDE_DELAY_SECS: u32 = 5;

/// Minimum auto-hide delay (in seconds).
pub const MIN_HIDE_DELAY_SECS: u32 = 1;

/// Maximum auto-hide delay (in seconds).
pub const MAX_HIDE_DELAY_SECS: u32 = 30;

/// Debounce window for mouse-movement sampling (in milliseconds).
pub const MOUSE_SAMPLE_INTERVAL_MS: u64 = 50;

/// Euclidean displacement between samples that counts as deliberate
/// movement (in pixels).
pub const MOUSE_MOVE_THRESHOLD_PX: f64 = 1.0;

/// Debounce window for window-resize handling (in milliseconds).
pub const RESIZE_DEBOUNCE_MS: u64 = 250;

// ==========================================================================
// Keyboard Defaults
// ==========================================================================

/// Seek step for the arrow keys (in seconds).
pub const ARROW_SEEK_STEP_SECS: f64 = 10.0;

/// Volume step for the arrow keys (in percentage points).
pub const ARROW_VOLUME_STEP_PERCENT: i8 = 1;

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Minimum volume percentage.
pub const MIN_VOLUME_PERCENT: u8 = 0;

/// Maximum volume percentage.
pub const MAX_VOLUME_PERCENT: u8 = 100;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Hide delay validation
    assert!(MIN_HIDE_DELAY_SECS > 0);
    assert!(MAX_HIDE_DELAY_SECS >= MIN_HIDE_DELAY_SECS);
    assert!(DEFAULT_HIDE_DELAY_SECS >= MIN_HIDE_DELAY_SECS);
    assert!(DEFAULT_HIDE_DELAY_SECS <= MAX_HIDE_DELAY_SECS);

    // Sampling validation
    assert!(MOUSE_SAMPLE_INTERVAL_MS > 0);
    assert!(RESIZE_DEBOUNCE_MS > 0);
    assert!(MOUSE_MOVE_THRESHOLD_PX > 0.0);

    // Keyboard validation
    assert!(ARROW_SEEK_STEP_SECS > 0.0);
    assert!(ARROW_VOLUME_STEP_PERCENT > 0);

    // Volume validation
    assert!(MAX_VOLUME_PERCENT > MIN_VOLUME_PERCENT);
    assert!(MAX_VOLUME_PERCENT == 100);
};
