//! Outbound application events.
//!
//! The [`EventConsumer`](crate::consumer::EventConsumer) and the boot path
//! emit these through the [`EventSink`](super::ports::EventSink) port.

use crate::stats::StatusReport;
use crate::trigger::record::EventRecord;

/// Structured events leaving the detector core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The detector loop is about to start with these thresholds.
    Started { threshold: u16, reset_threshold: u16 },

    /// One resolved pulse, in hand-off order.
    Pulse(EventRecord),

    /// Periodic status snapshot.
    Status(StatusReport),
}
