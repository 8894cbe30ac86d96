//! Short delays for the Above-state poll and calibration spacing on host.
//!
//! On ESP-IDF the ROM delay (`esp_idf_hal::delay::Ets`) and the FreeRTOS
//! delay already implement [`DelayNs`]; host builds sleep the thread.

use embedded_hal::delay::DelayNs;

/// `DelayNs` over `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(ns as u64));
    }
}
