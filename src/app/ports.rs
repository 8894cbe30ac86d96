//! Port traits: the hexagonal boundary between the detector core and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SampleSource / DetectorLoop / EventConsumer
//! ```
//!
//! Driven adapters (ADC, clock, event sinks) implement these traits.  The
//! core consumes them via generics, so the trigger logic never touches
//! registers directly and runs unchanged against scripted mocks on host.

use crate::sensors::sample::{ChannelId, Timestamp};

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: ADC → core)
// ───────────────────────────────────────────────────────────────

/// Multi-channel analog front end.
///
/// Selecting an input and converting it are separate steps.  Selection may
/// carry a settling cost; implementations own that cost and callers must not
/// assume it is zero.
///
/// There is no error return: a failed conversion reads as a low value and is
/// indistinguishable from a quiet signal.  Tests that script the port must
/// not expect the core to detect ADC faults.
pub trait AnalogPort {
    /// Route the converter to `channel`.
    fn select_input(&mut self, channel: ChannelId);

    /// Latest conversion of the selected input.
    fn read_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  Wall-clock sources are unsuitable; they jump.
pub trait ClockPort {
    fn now(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging / transport)
// ───────────────────────────────────────────────────────────────

/// The consumer forwards structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT,
/// SD card).  Implementations must not block indefinitely; retry and
/// timeout policy belongs to the adapter.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
