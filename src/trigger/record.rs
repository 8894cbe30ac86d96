//! The event record handed from the detector loop to the consumer.

use core::time::Duration;

use serde::{Serialize, Serializer};

use crate::sensors::sample::Timestamp;

/// How the pulse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    /// Decayed below the reset threshold.
    Complete,
    /// Still at or above reset when the stuck-high escape fired.
    Stuck,
}

/// One resolved pulse.
///
/// Only built after the detector returns from Above to Idle, so
/// `duration_above_reset` is always a real, non-negative interval.
/// `trigger_magnitude` is the reading that crossed threshold, not the
/// maximum; `peak_magnitude` carries the maximum seen while Above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Running pulse count since boot, starting at 1.
    pub sequence: u32,
    pub kind: PulseKind,
    pub trigger_magnitude: u16,
    /// Last primary reading, the one that fell below reset.
    pub settle_magnitude: u16,
    pub peak_magnitude: u16,
    /// Temperature channel, sampled once after the pulse resolved.
    pub auxiliary_magnitude: u16,
    pub trigger_time: Timestamp,
    #[serde(serialize_with = "as_micros")]
    pub duration_above_reset: Duration,
    /// Trigger-to-trigger interval from the previous pulse; `None` for the first.
    #[serde(serialize_with = "opt_as_micros")]
    pub since_previous: Option<Duration>,
}

impl EventRecord {
    /// Compact JSON rendering for transport adapters.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn as_micros<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_micros() as u64)
}

fn opt_as_micros<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&(d.as_micros() as u64)),
        None => s.serialize_none(),
    }
}
