//! Error types for the detector front end.
//!
//! The taxonomy is narrow: configuration problems are rejected
//! when the detector is built, and a full hand-off channel is reported only
//! to callers that explicitly asked for a non-blocking push.  Sampling
//! failures are not errors at all; a failed conversion reads as a low value.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A detector configuration that cannot be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The hysteresis band is empty or inverted.
    ResetNotBelowThreshold { threshold: u16, reset_threshold: u16 },
    /// The Above-state poll delay must be non-zero to respect conversion latency.
    ZeroPollDelay,
    /// A stuck-high escape of zero microseconds would fire on every trigger.
    ZeroMaxPulse,
    /// Calibration needs at least one sample.
    ZeroCalibrationSamples,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResetNotBelowThreshold {
                threshold,
                reset_threshold,
            } => write!(
                f,
                "reset threshold {reset_threshold} must be below threshold {threshold}"
            ),
            Self::ZeroPollDelay => write!(f, "poll delay must be non-zero"),
            Self::ZeroMaxPulse => write!(f, "max pulse duration must be non-zero"),
            Self::ZeroCalibrationSamples => write!(f, "calibration needs at least one sample"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Back-pressure
// ---------------------------------------------------------------------------

/// The hand-off channel was full.  Carries the rejected value back to the
/// caller, which decides whether to drop or retry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocked<T>(pub T);

impl<T> Blocked<T> {
    /// Recover the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Blocked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event channel full")
    }
}

impl<T: fmt::Debug> std::error::Error for Blocked<T> {}
