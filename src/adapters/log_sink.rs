//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured events to the logger
//! (UART / USB-CDC in production).  A transport adapter (MQTT, SD card)
//! would implement the same trait.

use log::{Level, log};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::hw_init::ADC_FULL_SCALE;
use crate::sensors::auxiliary::to_millivolts;
use crate::trigger::record::PulseKind;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let (level, line) = render(event);
        log!(level, "{}", line);
    }
}

/// One log line and its level for `event`.  Stuck pulses and status
/// encoding failures are warnings.
fn render(event: &AppEvent) -> (Level, String) {
    match event {
        AppEvent::Pulse(r) => {
            let line = format!(
                "PULSE | #{} | adc={} peak={} settle={} | temp_adc={} ({}mV) | t={}us dt={}us",
                r.sequence,
                r.trigger_magnitude,
                r.peak_magnitude,
                r.settle_magnitude,
                r.auxiliary_magnitude,
                to_millivolts(r.auxiliary_magnitude, ADC_FULL_SCALE),
                r.trigger_time.as_micros(),
                r.duration_above_reset.as_micros(),
            );
            match r.kind {
                PulseKind::Complete => (Level::Info, line),
                PulseKind::Stuck => (Level::Warn, format!("{} | STUCK", line)),
            }
        }
        AppEvent::Status(s) => match s.to_json() {
            Ok(json) => (Level::Info, format!("STATUS | {}", json)),
            Err(e) => (Level::Warn, format!("STATUS | encode failed: {}", e)),
        },
        AppEvent::Started {
            threshold,
            reset_threshold,
        } => (
            Level::Info,
            format!("START | threshold={} reset={}", threshold, reset_threshold),
        ),
    }
}
