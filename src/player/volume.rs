// SPDX-License-Identifier: MPL-2.0
//! Volume domain type for the playback facade.
//!
//! This module provides a type-safe wrapper for volume percentages,
//! ensuring they are always within the valid range (0–100).

use crate::config::{MAX_VOLUME_PERCENT, MIN_VOLUME_PERCENT};

/// Volume percentage, guaranteed to be within [0, 100].
///
/// This newtype enforces validity at the type level, making it impossible
/// to hold an out-of-range or non-finite volume. Inputs are clamped and
/// rounded; NaN collapses to 0.
///
/// # Example
///
/// ```
/// use playdeck::player::VolumePercent;
///
/// let vol = VolumePercent::from_input(57.0);
/// assert_eq!(vol.value(), 57);
///
/// // Values outside range are clamped
/// assert_eq!(VolumePercent::from_input(150.0).value(), 100);
/// assert_eq!(VolumePercent::from_input(-10.0).value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Creates a volume percentage from arbitrary caller input, clamping
    /// to [0, 100] and rounding to the nearest whole percent.
    #[must_use]
    pub fn from_input(value: f64) -> Self {
        if value.is_nan() {
            return Self(MIN_VOLUME_PERCENT);
        }
        let clamped = value.clamp(
            f64::from(MIN_VOLUME_PERCENT),
            f64::from(MAX_VOLUME_PERCENT),
        );
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(clamped.round() as u8)
    }

    /// Creates a volume percentage from the host's [0, 1] scalar.
    #[must_use]
    pub fn from_scalar(value: f64) -> Self {
        Self::from_input(value * 100.0)
    }

    /// Returns the percentage as an integer.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Converts to the host's [0, 1] scale, rounded to 2 decimal places
    /// of underlying precision.
    #[must_use]
    pub fn to_scalar(self) -> f64 {
        (f64::from(self.0) / 100.0 * 100.0).round() / 100.0
    }

    /// Returns true if this is the minimum volume.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 == MIN_VOLUME_PERCENT
    }

    /// Returns true if this is the maximum volume.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 == MAX_VOLUME_PERCENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn from_input_clamps_to_valid_range() {
        assert_eq!(VolumePercent::from_input(-10.0).value(), 0);
        assert_eq!(VolumePercent::from_input(150.0).value(), 100);
        assert_eq!(VolumePercent::from_input(57.0).value(), 57);
    }

    #[test]
    fn from_input_rounds_fractions() {
        assert_eq!(VolumePercent::from_input(57.4).value(), 57);
        assert_eq!(VolumePercent::from_input(57.5).value(), 58);
    }

    #[test]
    fn from_input_rejects_non_finite() {
        assert_eq!(VolumePercent::from_input(f64::NAN).value(), 0);
        assert_eq!(VolumePercent::from_input(f64::INFINITY).value(), 100);
        assert_eq!(VolumePercent::from_input(f64::NEG_INFINITY).value(), 0);
    }

    #[test]
    fn from_scalar_converts_host_scale() {
        assert_eq!(VolumePercent::from_scalar(0.8).value(), 80);
        assert_eq!(VolumePercent::from_scalar(0.0).value(), 0);
        assert_eq!(VolumePercent::from_scalar(1.0).value(), 100);
        // A host scalar that is not a whole percent rounds. 0.575 sits
        // just below 57.5 in binary, so it rounds down.
        assert_eq!(VolumePercent::from_scalar(0.575).value(), 57);
        assert_eq!(VolumePercent::from_scalar(0.585).value(), 58);
    }

    #[test]
    fn to_scalar_has_two_decimal_precision() {
        assert_abs_diff_eq!(VolumePercent::from_input(57.0).to_scalar(), 0.57);
        assert_abs_diff_eq!(VolumePercent::from_input(100.0).to_scalar(), 1.0);
        assert_abs_diff_eq!(VolumePercent::from_input(0.0).to_scalar(), 0.0);
    }

    #[test]
    fn min_and_max_detection() {
        assert!(VolumePercent::from_input(0.0).is_min());
        assert!(!VolumePercent::from_input(1.0).is_min());
        assert!(VolumePercent::from_input(100.0).is_max());
        assert!(!VolumePercent::from_input(99.0).is_max());
    }
}
