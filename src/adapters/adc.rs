//! Analog front-end adapters.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`OneshotAdc`] reads ADC1 through the oneshot driver
//! configured by `hw_init`.
//! On host/test: [`SimAnalog`] reads levels injected through a shared
//! [`SimLevels`] handle, so a test thread can shape pulses while the
//! detector loop runs in another.

use core::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use crate::app::ports::AnalogPort;
use crate::sensors::sample::ChannelId;

// ── ESP-IDF oneshot ADC ───────────────────────────────────────

/// ADC1 oneshot reader.  The oneshot API names the channel on every read,
/// so selection only records the target and settling happens in the driver.
#[cfg(target_os = "espidf")]
pub struct OneshotAdc {
    channel: u32,
}

#[cfg(target_os = "espidf")]
impl OneshotAdc {
    pub fn new() -> Self {
        Self {
            channel: crate::drivers::hw_init::ADC1_CH_PRIMARY,
        }
    }
}

#[cfg(target_os = "espidf")]
impl AnalogPort for OneshotAdc {
    fn select_input(&mut self, channel: ChannelId) {
        use crate::drivers::hw_init::{ADC1_CH_AUX, ADC1_CH_PRIMARY};
        self.channel = match channel {
            ChannelId::Primary => ADC1_CH_PRIMARY,
            ChannelId::Auxiliary => ADC1_CH_AUX,
        };
    }

    fn read_raw(&mut self) -> u16 {
        crate::drivers::hw_init::adc1_read(self.channel)
    }
}

// ── Simulated front end ───────────────────────────────────────

/// Writer half: set the level each channel will read.
#[derive(Clone, Default)]
pub struct SimLevels {
    levels: Arc<[AtomicU16; 2]>,
}

impl SimLevels {
    pub fn set(&self, channel: ChannelId, raw: u16) {
        self.levels[index(channel)].store(raw, Ordering::Relaxed);
    }

    pub fn get(&self, channel: ChannelId) -> u16 {
        self.levels[index(channel)].load(Ordering::Relaxed)
    }
}

/// Reader half: an [`AnalogPort`] over the injected levels.
pub struct SimAnalog {
    levels: SimLevels,
    selected: ChannelId,
}

impl SimAnalog {
    /// A simulated front end and the handle that drives it.
    pub fn new() -> (Self, SimLevels) {
        let levels = SimLevels::default();
        (
            Self {
                levels: levels.clone(),
                selected: ChannelId::Primary,
            },
            levels,
        )
    }
}

impl AnalogPort for SimAnalog {
    fn select_input(&mut self, channel: ChannelId) {
        self.selected = channel;
    }

    fn read_raw(&mut self) -> u16 {
        self.levels.get(self.selected)
    }
}

fn index(channel: ChannelId) -> usize {
    match channel {
        ChannelId::Primary => 0,
        ChannelId::Auxiliary => 1,
    }
}
