//! Application boundary: port traits and the events that cross them.

pub mod events;
pub mod ports;
