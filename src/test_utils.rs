// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Re-exports the `approx` crate's assertion macros for float comparison,
//! which handle the precision issues `assert_eq!` cannot.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};
