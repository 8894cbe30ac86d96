//! Temperature (auxiliary) channel, read once per resolved pulse.
//!
//! Never read from the Above-state polling loop: switching the converter
//! mid-pulse adds settling latency to the timed window.

use super::SampleSource;
use super::sample::ChannelId;
use crate::app::ports::{AnalogPort, ClockPort};

/// Reference voltage of the front-end ADC.
const V_REF_MV: u32 = 3300;

/// Stateless single-shot reader for the auxiliary channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuxiliarySampler;

impl AuxiliarySampler {
    pub fn new() -> Self {
        Self
    }

    /// Convert the auxiliary channel once.
    pub fn read_once<A: AnalogPort, C: ClockPort>(&self, source: &mut SampleSource<A, C>) -> u16 {
        source.read(ChannelId::Auxiliary).magnitude
    }
}

/// Raw counts to millivolts for a converter whose full scale is `full_scale`.
pub fn to_millivolts(raw: u16, full_scale: u16) -> u32 {
    if full_scale == 0 {
        return 0;
    }
    raw.min(full_scale) as u32 * V_REF_MV / full_scale as u32
}
