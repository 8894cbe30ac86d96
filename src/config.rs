//! Detector configuration parameters
//!
//! All tunable parameters for the trigger front end.  Consumed once at
//! construction; nothing here is re-read while the detector loop runs.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Depth of the detector → consumer hand-off channel.
/// Sized like the hardware inter-core FIFO of the reference board.
pub const EVENT_CHANNEL_DEPTH: usize = 8;

/// Trigger and hand-off configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    // --- Hysteresis ---
    /// Rising trigger level (raw ADC counts). Strictly exceeded to trigger.
    pub threshold: u16,
    /// Falling reset level (raw ADC counts). Must be below `threshold`.
    pub reset_threshold: u16,

    // --- Timing ---
    /// Delay between primary-channel polls while Above (microseconds).
    pub poll_delay_us: u32,
    /// Stuck-high escape. `None` spins in Above until the signal decays,
    /// however long that takes; a sensor stuck high then holds the detector
    /// indefinitely.
    pub max_pulse_us: Option<u32>,

    // --- Hand-off ---
    /// Bounded push. `None` blocks the detector until the consumer frees a
    /// slot; `Some(ms)` gives up after `ms` and drops the record.
    pub push_timeout_ms: Option<u32>,

    // --- Calibration ---
    /// Derive thresholds from a quiet-signal baseline at boot.
    pub calibration: Option<CalibrationConfig>,
}

/// Baseline calibration run before the detector starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Number of quiet samples to average.
    pub samples: u16,
    /// Spacing between calibration samples (milliseconds).
    pub interval_ms: u32,
    /// `threshold = baseline + threshold_offset`.
    pub threshold_offset: u16,
    /// `reset_threshold = baseline + reset_offset`.
    pub reset_offset: u16,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: 500,
            interval_ms: 10,
            threshold_offset: 1000,
            reset_offset: 50,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 1000,
            reset_threshold: 900,

            poll_delay_us: 3, // ~80 ADC clocks per conversion

            max_pulse_us: None,
            push_timeout_ms: None,

            calibration: None,
        }
    }
}

impl DetectorConfig {
    /// Check every invariant the detector relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reset_threshold >= self.threshold {
            return Err(ConfigError::ResetNotBelowThreshold {
                threshold: self.threshold,
                reset_threshold: self.reset_threshold,
            });
        }
        if self.poll_delay_us == 0 {
            return Err(ConfigError::ZeroPollDelay);
        }
        if self.max_pulse_us == Some(0) {
            return Err(ConfigError::ZeroMaxPulse);
        }
        if let Some(cal) = &self.calibration {
            if cal.samples == 0 {
                return Err(ConfigError::ZeroCalibrationSamples);
            }
            if cal.reset_offset >= cal.threshold_offset {
                return Err(ConfigError::ResetNotBelowThreshold {
                    threshold: cal.threshold_offset,
                    reset_threshold: cal.reset_offset,
                });
            }
        }
        Ok(())
    }

    /// Replace the thresholds with ones derived from a measured baseline.
    ///
    /// Saturates at the top of the ADC range; the result is re-validated
    /// because saturation can collapse the hysteresis band.
    pub fn with_baseline(mut self, baseline: u16, cal: &CalibrationConfig) -> Result<Self, ConfigError> {
        self.threshold = baseline.saturating_add(cal.threshold_offset);
        self.reset_threshold = baseline.saturating_add(cal.reset_offset);
        self.validate()?;
        Ok(self)
    }
}
