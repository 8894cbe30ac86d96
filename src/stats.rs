//! Consumer-side run statistics: event rate and the status report.
//!
//! The rate is the inverse of the mean trigger-to-trigger interval over
//! the last [`RATE_WINDOW`] pulses, kept in a fixed-size history buffer.

use core::time::Duration;

use heapless::HistoryBuffer;
use serde::Serialize;

/// Number of recent inter-event intervals averaged for the rate.
pub const RATE_WINDOW: usize = 10;

/// Rolling event-rate estimate.
#[derive(Default)]
pub struct RateMeter {
    intervals_us: HistoryBuffer<u64, RATE_WINDOW>,
}

impl RateMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, interval: Duration) {
        self.intervals_us.write(interval.as_micros() as u64);
    }

    /// Events per second; `None` until an interval has been seen or if the
    /// window averages to zero.
    pub fn rate_hz(&self) -> Option<f32> {
        let n = self.intervals_us.len();
        if n == 0 {
            return None;
        }
        let total: u64 = self.intervals_us.as_slice().iter().sum();
        if total == 0 {
            return None;
        }
        let mean_us = total as f64 / n as f64;
        Some((1_000_000.0 / mean_us) as f32)
    }
}

/// Point-in-time status suitable for logging or publishing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    /// Records drained from the hand-off channel since boot.
    pub pulses: u32,
    /// Of which ended through the stuck-high escape.
    pub stuck: u32,
    pub rate_hz: Option<f32>,
    pub threshold: u16,
    pub reset_threshold: u16,
    pub uptime_secs: u64,
}

impl StatusReport {
    /// Compact JSON rendering.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
