//! Boot-time baseline calibration of the primary channel.
//!
//! Averages a run of quiet samples (no pulses expected) to find the
//! pedestal, then places the trigger and reset levels at fixed offsets
//! above it.

use embedded_hal::delay::DelayNs;
use log::info;

use super::SampleSource;
use super::sample::ChannelId;
use crate::app::ports::{AnalogPort, ClockPort};
use crate::config::{CalibrationConfig, DetectorConfig};
use crate::error::ConfigError;

/// Pedestal statistics of the primary channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub mean: f32,
    pub rms: f32,
}

impl Baseline {
    /// Mean and standard deviation of `samples`.  `None` if empty.
    pub fn from_samples(samples: impl IntoIterator<Item = u16>) -> Option<Self> {
        let mut n = 0u32;
        let mut sum = 0f64;
        let mut sum_sq = 0f64;
        for s in samples {
            let v = s as f64;
            n += 1;
            sum += v;
            sum_sq += v * v;
        }
        if n == 0 {
            return None;
        }
        let mean = sum / n as f64;
        let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
        Some(Self {
            mean: mean as f32,
            rms: variance.sqrt() as f32,
        })
    }

    /// Pedestal rounded to ADC counts.
    pub fn counts(&self) -> u16 {
        self.mean.round().clamp(0.0, u16::MAX as f32) as u16
    }
}

/// Sample the quiet primary channel and measure its baseline.
pub fn measure<A, C, D>(
    source: &mut SampleSource<A, C>,
    delay: &mut D,
    cal: &CalibrationConfig,
) -> Result<Baseline, ConfigError>
where
    A: AnalogPort,
    C: ClockPort,
    D: DelayNs,
{
    if cal.samples == 0 {
        return Err(ConfigError::ZeroCalibrationSamples);
    }
    let readings = (0..cal.samples).map(|_| {
        let s = source.read(ChannelId::Primary).magnitude;
        delay.delay_ms(cal.interval_ms);
        s
    });
    Baseline::from_samples(readings).ok_or(ConfigError::ZeroCalibrationSamples)
}

/// Measure the baseline and return `config` with thresholds placed on it.
pub fn calibrate<A, C, D>(
    config: DetectorConfig,
    source: &mut SampleSource<A, C>,
    delay: &mut D,
) -> Result<DetectorConfig, ConfigError>
where
    A: AnalogPort,
    C: ClockPort,
    D: DelayNs,
{
    let Some(cal) = config.calibration else {
        return Ok(config);
    };
    let baseline = measure(source, delay, &cal)?;
    let calibrated = config.with_baseline(baseline.counts(), &cal)?;
    info!(
        "calibration: baseline={:.1} rms={:.1} -> threshold={} reset={}",
        baseline.mean, baseline.rms, calibrated.threshold, calibrated.reset_threshold
    );
    Ok(calibrated)
}
