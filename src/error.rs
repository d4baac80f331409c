// SPDX-License-Identifier: MPL-2.0
//! Error taxonomy for the control layer.
//!
//! Three distinct failure shapes exist here:
//! - [`HostError`] — a host-policy refusal (autoplay blocked, fullscreen
//!   denied). Always caught at the call site and logged; never propagated.
//! - [`MediaFault`] — a fault reported by the native media element. Passed
//!   through to subscribers unmodified; the core does not retry.
//! - [`Error`] — crate-level failures (settings file I/O and parsing).
//!
//! Invalid numeric inputs (NaN seeks, malformed volume values) are not
//! errors at all: the affected operations are silent no-ops.

use thiserror::Error;

/// A request the host environment refused for policy reasons.
///
/// Fullscreen rejection in particular is expected and non-fatal; callers
/// log it as a warning and leave state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host rejected request: {reason}")]
pub struct HostError {
    reason: String,
}

impl HostError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A native media error, surfaced verbatim as a passthrough event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("media fault (code {code:?}): {message}")]
pub struct MediaFault {
    /// Host-specific numeric error code, when one exists.
    pub code: Option<u32>,
    /// Human-readable description from the host.
    pub message: String,
}

impl MediaFault {
    pub fn new(code: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_displays_reason() {
        let err = HostError::new("fullscreen denied");
        assert_eq!(err.to_string(), "host rejected request: fullscreen denied");
        assert_eq!(err.reason(), "fullscreen denied");
    }

    #[test]
    fn media_fault_displays_code_and_message() {
        let fault = MediaFault::new(Some(4), "MEDIA_ELEMENT_ERROR");
        let text = fault.to_string();
        assert!(text.contains('4'));
        assert!(text.contains("MEDIA_ELEMENT_ERROR"));
    }

    #[test]
    fn media_fault_without_code() {
        let fault = MediaFault::new(None, "unknown failure");
        assert!(fault.to_string().contains("unknown failure"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
