//! Hysteresis pulse trigger.
//!
//! ```text
//!            magnitude > threshold
//!   ┌──────┐ ─────────────────────▶ ┌───────┐
//!   │ Idle │                        │ Above │ ◀─┐ magnitude ≥ reset
//!   └──────┘ ◀───────────────────── └───────┘ ──┘
//!            magnitude < reset
//!            (or stuck-high escape)
//! ```
//!
//! [`TriggerDetector`] is a pure state machine over [`RawSample`]s: it owns
//! the state and the trigger timestamp and does no I/O.  The band between
//! `reset_threshold` and `threshold` keeps noise near a single level from
//! re-triggering.  The [`runner`] drives it from real hardware.

pub mod record;
pub mod runner;

use core::time::Duration;

use log::debug;

use crate::config::DetectorConfig;
use crate::error::ConfigError;
use crate::sensors::sample::{RawSample, Timestamp};
use record::{EventRecord, PulseKind};

/// Detector state.  Exactly one instance, owned by the detector loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Above,
}

/// Result of feeding one primary sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Idle and below threshold.
    Quiet,
    /// Just crossed threshold; now Above.
    Triggered,
    /// Above and not yet decayed.
    Holding,
    /// Pulse over; the detector is Idle again.
    Resolved(PulseCapture),
}

/// Everything about a finished pulse except the auxiliary reading, which
/// the caller takes once the hot loop is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseCapture {
    pub sequence: u32,
    pub kind: PulseKind,
    pub trigger_magnitude: u16,
    pub settle_magnitude: u16,
    pub peak_magnitude: u16,
    pub trigger_time: Timestamp,
    pub duration_above_reset: Duration,
    pub since_previous: Option<Duration>,
}

impl PulseCapture {
    /// Complete the record with the auxiliary-channel reading.
    pub fn into_record(self, auxiliary_magnitude: u16) -> EventRecord {
        EventRecord {
            sequence: self.sequence,
            kind: self.kind,
            trigger_magnitude: self.trigger_magnitude,
            settle_magnitude: self.settle_magnitude,
            peak_magnitude: self.peak_magnitude,
            auxiliary_magnitude,
            trigger_time: self.trigger_time,
            duration_above_reset: self.duration_above_reset,
            since_previous: self.since_previous,
        }
    }
}

/// Hysteresis edge/pulse detector.
pub struct TriggerDetector {
    threshold: u16,
    reset_threshold: u16,
    max_pulse: Option<Duration>,

    state: TriggerState,
    trigger_time: Option<Timestamp>,
    trigger_magnitude: u16,
    peak_magnitude: u16,

    /// Trigger time of the previous pulse, for the inter-event interval.
    last_trigger: Option<Timestamp>,
    pulses: u32,
    stuck: u32,
}

impl TriggerDetector {
    /// Build a detector.  Rejects an invalid configuration without
    /// constructing anything.
    pub fn new(config: &DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            threshold: config.threshold,
            reset_threshold: config.reset_threshold,
            max_pulse: config.max_pulse_us.map(|us| Duration::from_micros(us as u64)),
            state: TriggerState::Idle,
            trigger_time: None,
            trigger_magnitude: 0,
            peak_magnitude: 0,
            last_trigger: None,
            pulses: 0,
            stuck: 0,
        })
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Timestamp of the crossing while Above; `None` while Idle.
    pub fn trigger_time(&self) -> Option<Timestamp> {
        self.trigger_time
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn reset_threshold(&self) -> u16 {
        self.reset_threshold
    }

    /// Pulses resolved since boot, stuck ones included.
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }

    /// Pulses that ended through the stuck-high escape.
    pub fn stuck_count(&self) -> u32 {
        self.stuck
    }

    /// Advance the state machine by one primary-channel sample.
    pub fn step(&mut self, sample: &RawSample) -> Step {
        let m = sample.magnitude;
        match self.state {
            TriggerState::Idle => {
                if m > self.threshold {
                    self.state = TriggerState::Above;
                    self.trigger_time = Some(sample.sampled_at);
                    self.trigger_magnitude = m;
                    self.peak_magnitude = m;
                    Step::Triggered
                } else {
                    Step::Quiet
                }
            }
            TriggerState::Above => {
                self.peak_magnitude = self.peak_magnitude.max(m);
                let started = self.trigger_time.unwrap_or(sample.sampled_at);
                let elapsed = sample.sampled_at.saturating_since(started);

                if m < self.reset_threshold {
                    Step::Resolved(self.resolve(PulseKind::Complete, m, started, elapsed))
                } else if self.max_pulse.is_some_and(|max| elapsed >= max) {
                    self.stuck = self.stuck.wrapping_add(1);
                    Step::Resolved(self.resolve(PulseKind::Stuck, m, started, elapsed))
                } else {
                    Step::Holding
                }
            }
        }
    }

    fn resolve(&mut self, kind: PulseKind, settle: u16, started: Timestamp, elapsed: Duration) -> PulseCapture {
        self.pulses = self.pulses.wrapping_add(1);
        let since_previous = self.last_trigger.map(|prev| started.saturating_since(prev));
        self.last_trigger = Some(started);
        self.state = TriggerState::Idle;
        self.trigger_time = None;

        debug!(
            "pulse #{} {:?}: trig={} settle={} peak={} dt={}us",
            self.pulses,
            kind,
            self.trigger_magnitude,
            settle,
            self.peak_magnitude,
            elapsed.as_micros()
        );

        PulseCapture {
            sequence: self.pulses,
            kind,
            trigger_magnitude: self.trigger_magnitude,
            settle_magnitude: settle,
            peak_magnitude: self.peak_magnitude,
            trigger_time: started,
            duration_above_reset: elapsed,
            since_previous,
        }
    }
}
