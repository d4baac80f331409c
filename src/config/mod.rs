// SPDX-License-Identifier: MPL-2.0
//! Persisted preferences and runtime tunables for the control layer.
//!
//! [`Config`] is the on-disk shape, loaded from and saved to a
//! `settings.toml` under the platform config directory. Fields are
//! optional so a partial file (or none at all) falls back to defaults.
//! [`Tunables`] is the validated runtime shape: every value clamped into
//! its legal range and converted to `Duration`s, ready to hand to the
//! input controller.
//!
//! ```no_run
//! use playdeck::config::{self, Tunables};
//!
//! let config = config::load().unwrap_or_default();
//! let tunables = Tunables::from_config(&config);
//! assert!(tunables.hide_delay.as_secs() >= 1);
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "playdeck";

/// On-disk preferences. All fields optional; missing values use the
/// defaults from [`defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Auto-hide delay for the controls overlay, in seconds.
    #[serde(default)]
    pub hide_delay_secs: Option<u32>,

    /// Mouse-movement sample window, in milliseconds.
    #[serde(default)]
    pub mouse_sample_interval_ms: Option<u64>,

    /// Arrow-key seek step, in seconds.
    #[serde(default)]
    pub arrow_seek_step_secs: Option<f64>,
}

/// Validated runtime tunables derived from a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    pub hide_delay: Duration,
    pub mouse_sample_interval: Duration,
    pub mouse_move_threshold_px: f64,
    pub resize_debounce: Duration,
    pub arrow_seek_step_secs: f64,
    pub arrow_volume_step_percent: i8,
    pub ready_level_threshold: u8,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            hide_delay: Duration::from_secs(u64::from(DEFAULT_HIDE_DELAY_SECS)),
            mouse_sample_interval: Duration::from_millis(MOUSE_SAMPLE_INTERVAL_MS),
            mouse_move_threshold_px: MOUSE_MOVE_THRESHOLD_PX,
            resize_debounce: Duration::from_millis(RESIZE_DEBOUNCE_MS),
            arrow_seek_step_secs: ARROW_SEEK_STEP_SECS,
            arrow_volume_step_percent: ARROW_VOLUME_STEP_PERCENT,
            ready_level_threshold: READY_LEVEL_THRESHOLD,
        }
    }
}

impl Tunables {
    /// Builds runtime tunables from on-disk preferences, clamping every
    /// provided value into its legal range.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut tunables = Self::default();

        if let Some(secs) = config.hide_delay_secs {
            let clamped = secs.clamp(MIN_HIDE_DELAY_SECS, MAX_HIDE_DELAY_SECS);
            tunables.hide_delay = Duration::from_secs(u64::from(clamped));
        }
        if let Some(ms) = config.mouse_sample_interval_ms {
            tunables.mouse_sample_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(step) = config.arrow_seek_step_secs {
            if step.is_finite() && step > 0.0 {
                tunables.arrow_seek_step_secs = step;
            }
        }

        tunables
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
