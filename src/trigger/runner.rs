//! The detector loop: drives [`TriggerDetector`] from the sample source and
//! hands completed records to the [`EventChannel`].
//!
//! Runs in its own execution context (pinned to the application core on
//! ESP-IDF) and never returns.  Its only suspension points are the fixed
//! delay between Above-state polls and the push into the channel.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::record::EventRecord;
use super::{PulseCapture, Step, TriggerDetector};
use crate::app::ports::{AnalogPort, ClockPort};
use crate::config::DetectorConfig;
use crate::error::{Blocked, ConfigError};
use crate::events::EventChannel;
use crate::sensors::SampleSource;
use crate::sensors::auxiliary::AuxiliarySampler;
use crate::sensors::sample::ChannelId;

/// What happens when the channel is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPolicy {
    /// Park until the consumer frees a slot.
    Block,
    /// Wait at most this long, then drop the record.
    DropAfter(Duration),
}

impl PushPolicy {
    fn from_config(config: &DetectorConfig) -> Self {
        match config.push_timeout_ms {
            None => Self::Block,
            Some(ms) => Self::DropAfter(Duration::from_millis(ms as u64)),
        }
    }
}

pub struct DetectorLoop<A, C, D> {
    source: SampleSource<A, C>,
    detector: TriggerDetector,
    auxiliary: AuxiliarySampler,
    delay: D,
    poll_delay_us: u32,
    policy: PushPolicy,
}

impl<A, C, D> DetectorLoop<A, C, D>
where
    A: AnalogPort,
    C: ClockPort,
    D: DelayNs,
{
    /// Build the loop.  Fails on an invalid configuration.
    pub fn new(source: SampleSource<A, C>, delay: D, config: &DetectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector: TriggerDetector::new(config)?,
            source,
            auxiliary: AuxiliarySampler::new(),
            delay,
            poll_delay_us: config.poll_delay_us,
            policy: PushPolicy::from_config(config),
        })
    }

    pub fn detector(&self) -> &TriggerDetector {
        &self.detector
    }

    pub fn source(&self) -> &SampleSource<A, C> {
        &self.source
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Take one Idle-state sample.  If it triggers, spin on the primary
    /// channel until the pulse resolves and return the completed record.
    ///
    /// With the stuck-high escape disabled a signal that never decays
    /// keeps this call spinning forever.
    pub fn poll(&mut self) -> Option<EventRecord> {
        let sample = self.source.read(ChannelId::Primary);
        if self.detector.step(&sample) != Step::Triggered {
            return None;
        }

        loop {
            self.delay.delay_us(self.poll_delay_us);
            let sample = self.source.read(ChannelId::Primary);
            if let Step::Resolved(capture) = self.detector.step(&sample) {
                return Some(self.finish(capture));
            }
        }
    }

    /// Poll once and push any completed record.  Returns the record if the
    /// bounded push policy had to drop it.
    pub fn poll_and_push<const N: usize>(&mut self, channel: &EventChannel<N>) -> Option<EventRecord> {
        let record = self.poll()?;
        match self.policy {
            PushPolicy::Block => {
                channel.push(record);
                None
            }
            PushPolicy::DropAfter(timeout) => match channel.push_timeout(record, timeout) {
                Ok(()) => None,
                Err(Blocked(dropped)) => {
                    warn!("event channel full, dropped pulse #{}", dropped.sequence);
                    Some(dropped)
                }
            },
        }
    }

    /// Run forever.  Termination is by power-down only.
    pub fn run<const N: usize>(&mut self, channel: &EventChannel<N>) -> ! {
        info!(
            "detector loop: threshold={} reset={} poll={}us policy={:?}",
            self.detector.threshold(),
            self.detector.reset_threshold(),
            self.poll_delay_us,
            self.policy
        );
        loop {
            let _ = self.poll_and_push(channel);
        }
    }

    fn finish(&mut self, capture: PulseCapture) -> EventRecord {
        let aux = self.auxiliary.read_once(&mut self.source);
        capture.into_record(aux)
    }
}
