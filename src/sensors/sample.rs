//! Raw sample and timestamp types shared by the sampling path.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Analog front-end channels.  The board exposes exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    /// SiPM pulse channel, polled continuously by the trigger.
    Primary,
    /// Temperature channel, read once per resolved pulse.
    Auxiliary,
}

/// Monotonic time since boot, microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Elapsed time from `earlier` to `self`; zero if `earlier` is later.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

/// One conversion of one channel.  Produced fresh on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub channel: ChannelId,
    pub magnitude: u16,
    pub sampled_at: Timestamp,
}
