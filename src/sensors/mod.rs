//! Sampling subsystem: the [`SampleSource`] over the analog front end,
//! the once-per-pulse [`auxiliary`] read, and boot-time [`calibration`].
//!
//! The source does no buffering: every call converts and timestamps a
//! fresh reading of the requested channel.

pub mod auxiliary;
pub mod calibration;
pub mod sample;

use crate::app::ports::{AnalogPort, ClockPort};
use sample::{ChannelId, RawSample};

/// Pairs an analog front end with a monotonic clock.
pub struct SampleSource<A, C> {
    analog: A,
    clock: C,
    /// Input the converter is currently routed to; `None` until first read.
    selected: Option<ChannelId>,
}

impl<A: AnalogPort, C: ClockPort> SampleSource<A, C> {
    pub fn new(analog: A, clock: C) -> Self {
        Self {
            analog,
            clock,
            selected: None,
        }
    }

    /// Convert `channel` and stamp the result.
    ///
    /// Re-selects the input only when it differs from the last one read,
    /// so the primary-channel hot loop never pays the settling cost.
    pub fn read(&mut self, channel: ChannelId) -> RawSample {
        if self.selected != Some(channel) {
            self.analog.select_input(channel);
            self.selected = Some(channel);
        }
        let magnitude = self.analog.read_raw();
        RawSample {
            channel,
            magnitude,
            sampled_at: self.clock.now(),
        }
    }

    pub fn analog(&self) -> &A {
        &self.analog
    }
}
