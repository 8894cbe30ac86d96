//! MuonWatch Firmware: Main Entry Point
//!
//! Two execution contexts share one bounded channel:
//!
//! ```text
//! ┌─────────────────────────── APP core ───────────────────────────┐
//! │  OneshotAdc ─▶ SampleSource ─▶ TriggerDetector ─▶ Auxiliary    │
//! │                        (DetectorLoop, busy-poll)     │         │
//! └──────────────────────────────────────────────────────┼─────────┘
//!                                                        ▼
//!                                          EventChannel<EVENT_CHANNEL_DEPTH>
//!                                                        │
//! ┌─────────────────────────── PRO core ─────────────────┼─────────┐
//! │  EventConsumer.service() ─▶ LogEventSink   (+ status reports)  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither loop returns; the device stops only on power-down.
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use log::info;

use muonwatch::adapters::adc::OneshotAdc;
use muonwatch::adapters::log_sink::LogEventSink;
use muonwatch::adapters::time::Esp32TimeAdapter;
use muonwatch::app::events::AppEvent;
use muonwatch::app::ports::EventSink;
use muonwatch::config::{CalibrationConfig, DetectorConfig, EVENT_CHANNEL_DEPTH};
use muonwatch::consumer::EventConsumer;
use muonwatch::drivers::{hw_init, task_pin};
use muonwatch::events::EventChannel;
use muonwatch::sensors::{SampleSource, calibration};
use muonwatch::trigger::runner::DetectorLoop;

/// Consumer drain period.  Must drain faster than the channel fills.
const CONSUMER_PERIOD_MS: u32 = 250;
/// Status report period.
const STATUS_INTERVAL_SECS: u64 = 30;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("MuonWatch v{}", env!("CARGO_PKG_VERSION"));

    hw_init::init_peripherals()?;

    // ── 2. Configuration + calibration ────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut source = SampleSource::new(OneshotAdc::new(), clock.clone());

    let config = DetectorConfig {
        calibration: Some(CalibrationConfig::default()),
        ..DetectorConfig::default()
    };
    config.validate()?;
    let config = calibration::calibrate(config, &mut source, &mut FreeRtos)?;

    // ── 3. Hand-off channel, shared by exactly the two loops ──
    let channel: &'static EventChannel<EVENT_CHANNEL_DEPTH> = Box::leak(Box::new(EventChannel::new()));

    let mut sink = LogEventSink::new();
    sink.emit(&AppEvent::Started {
        threshold: config.threshold,
        reset_threshold: config.reset_threshold,
    });

    // ── 4. Detector loop on the APP core ──────────────────────
    let mut detector_loop = DetectorLoop::new(source, Ets, &config)?;
    task_pin::spawn_on_core(task_pin::Core::App, 10, 8, "detector\0", move || {
        detector_loop.run(channel);
    })?;

    // ── 5. Consumer loop (this task, PRO core) ────────────────
    let mut consumer = EventConsumer::new(channel);
    let mut last_status = clock.uptime_secs();

    loop {
        consumer.service(&mut sink);

        let now = clock.uptime_secs();
        if now.saturating_sub(last_status) >= STATUS_INTERVAL_SECS {
            let status = consumer.status(config.threshold, config.reset_threshold, now);
            sink.emit(&AppEvent::Status(status));
            last_status = now;
        }

        FreeRtos::delay_ms(CONSUMER_PERIOD_MS);
    }
}
