//! Consumer side of the event hand-off.
//!
//! Runs in the second execution context.  [`EventConsumer::drain`] pops
//! until the channel is empty and never waits, so a slow or failing sink
//! cannot wedge the drain itself; it only delays the next drain.  Calling
//! it often enough to keep the channel from filling is the caller's job:
//! a full channel stalls the detector.

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::events::EventChannel;
use crate::stats::{RateMeter, StatusReport};
use crate::trigger::record::{EventRecord, PulseKind};

pub struct EventConsumer<'a, const N: usize> {
    channel: &'a EventChannel<N>,
    rate: RateMeter,
    pulses: u32,
    stuck: u32,
}

impl<'a, const N: usize> EventConsumer<'a, N> {
    pub fn new(channel: &'a EventChannel<N>) -> Self {
        Self {
            channel,
            rate: RateMeter::new(),
            pulses: 0,
            stuck: 0,
        }
    }

    /// Lazily pop every queued record, updating run statistics as each
    /// one is taken.
    pub fn drain(&mut self) -> impl Iterator<Item = EventRecord> + '_ {
        core::iter::from_fn(move || {
            let record = self.channel.pop()?;
            self.observe(&record);
            Some(record)
        })
    }

    /// Drain and forward every record to `sink`.  Returns how many were forwarded.
    pub fn service<S: EventSink>(&mut self, sink: &mut S) -> usize {
        let mut forwarded = 0;
        for record in self.drain() {
            sink.emit(&AppEvent::Pulse(record));
            forwarded += 1;
        }
        forwarded
    }

    /// Status snapshot for the given thresholds and uptime.
    pub fn status(&self, threshold: u16, reset_threshold: u16, uptime_secs: u64) -> StatusReport {
        StatusReport {
            pulses: self.pulses,
            stuck: self.stuck,
            rate_hz: self.rate.rate_hz(),
            threshold,
            reset_threshold,
            uptime_secs,
        }
    }

    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    fn observe(&mut self, record: &EventRecord) {
        self.pulses = self.pulses.wrapping_add(1);
        if record.kind == PulseKind::Stuck {
            self.stuck = self.stuck.wrapping_add(1);
        }
        if let Some(interval) = record.since_previous {
            self.rate.record(interval);
        }
    }
}
