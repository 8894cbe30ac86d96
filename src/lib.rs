//! MuonWatch detector front-end library.
//!
//! Exposes the trigger state machine, the event hand-off channel, and the
//! adapters for integration testing.  All ESP-IDF-specific code is guarded
//! by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod consumer;
pub mod drivers;
pub mod error;
pub mod events;
pub mod sensors;
pub mod stats;
pub mod trigger;
