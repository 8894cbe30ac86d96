//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to                      |
//! |------------|-------------|----------------------------------|
//! | `adc`      | AnalogPort  | ESP32 ADC1 oneshot / simulation  |
//! | `delay`    | DelayNs     | ROM delay / thread sleep         |
//! | `log_sink` | EventSink   | Serial log output                |
//! | `time`     | ClockPort   | ESP32 high-resolution timer      |

pub mod adc;
pub mod delay;
pub mod log_sink;
pub mod time;
