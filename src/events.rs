//! Detector → consumer event hand-off.
//!
//! A bounded single-producer / single-consumer FIFO of [`EventRecord`]s,
//! built on an `embassy-sync` channel so the same queue works between two
//! FreeRTOS tasks on ESP-IDF and two threads on host.
//!
//! ```text
//! ┌───────────────┐  EventRecord  ┌──────────────┐  ┌──────────────┐
//! │ Detector loop │──────────────▶│ EventChannel │─▶│ Consumer     │
//! │ (App core)    │  push/blocks  │  (depth N)   │  │ (Pro core)   │
//! └───────────────┘               └──────────────┘  └──────────────┘
//! ```
//!
//! Back-pressure: [`EventChannel::push`] never drops or overwrites.  When
//! the channel is full the producer parks until the consumer pops, which
//! ties detector liveness to consumer liveness: while the consumer is
//! stalled the detector samples nothing, and pulses arriving in that window
//! are lost without any counter.  [`EventChannel::push_timeout`] bounds the
//! wait for callers that prefer to drop.

use core::pin::pin;
use core::time::Duration;
use std::time::Instant;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use futures_lite::future;

use crate::error::Blocked;
use crate::trigger::record::EventRecord;

/// Bounded FIFO hand-off channel of capacity `N`.
///
/// Records move through by value under the channel's mutex, so the
/// consumer only ever observes complete records.
pub struct EventChannel<const N: usize> {
    inner: Channel<CriticalSectionRawMutex, EventRecord, N>,
}

impl<const N: usize> Default for EventChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventChannel<N> {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Push, parking the calling thread while the channel is full.
    ///
    /// Returns once a slot is free and the record is queued.  There is no
    /// upper bound on the wait.
    pub fn push(&self, record: EventRecord) {
        future::block_on(self.inner.send(record));
    }

    /// Push without waiting.
    pub fn try_push(&self, record: EventRecord) -> Result<(), Blocked<EventRecord>> {
        self.inner.try_send(record).map_err(|e| match e {
            TrySendError::Full(r) => Blocked(r),
        })
    }

    /// Push, giving up after `timeout`.  On failure the record is handed back.
    ///
    /// Parks on the channel's sender waker raced against a reactor timer, so
    /// a pop wakes the producer directly.  A timeout too large to express as
    /// a deadline waits like [`push`](Self::push).
    pub fn push_timeout(&self, record: EventRecord, timeout: Duration) -> Result<(), Blocked<EventRecord>> {
        let Err(Blocked(record)) = self.try_push(record) else {
            return Ok(());
        };
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.push(record);
            return Ok(());
        };

        future::block_on(async {
            let mut timer = pin!(Timer::at(deadline));
            let mut record = record;
            loop {
                let ready = async {
                    core::future::poll_fn(|cx| self.inner.poll_ready_to_send(cx)).await;
                    true
                };
                let expired = async {
                    timer.as_mut().await;
                    false
                };
                if !future::or(ready, expired).await {
                    return Err(Blocked(record));
                }
                match self.try_push(record) {
                    Ok(()) => return Ok(()),
                    Err(Blocked(r)) => record = r,
                }
            }
        })
    }

    /// Oldest queued record, if any.  Wakes a producer parked in [`push`](Self::push).
    pub fn pop(&self) -> Option<EventRecord> {
        self.inner.try_receive().ok()
    }

    /// Lazily pop until the channel is empty.
    pub fn drain(&self) -> impl Iterator<Item = EventRecord> + '_ {
        core::iter::from_fn(move || self.pop())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
