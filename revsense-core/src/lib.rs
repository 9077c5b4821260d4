//! Core counting engine for Revsense
//!
//! Measures rotational speed from a pulse-emitting sensor (optical or
//! magnetic encoder) by counting interrupt-triggered pulses and timing
//! the interval between the two most recent ones. Designed for
//! single-core MCUs where the pulse handler runs in interrupt context and
//! readings are taken from mainline code at arbitrary times.
//!
//! Key constraints:
//! - No heap allocation anywhere; counters and dispatch tables are
//!   `const`-constructible statics
//! - Bounded critical sections only (a fixed handful of word accesses)
//! - Snapshots are always internally consistent — a pulse landing
//!   mid-read can never produce a torn interval
//!
//! ```no_run
//! use revsense_core::{PulseCounter, RotationSensor};
//! # use revsense_core::traits::{ChannelId, Edge, InterruptLine, SensorHal};
//! # struct BoardHal;
//! # impl SensorHal for BoardHal {
//! #     fn interrupt_line(&self, _: ChannelId) -> Option<InterruptLine> { Some(0) }
//! #     fn configure_input(&mut self, _: ChannelId) {}
//! #     fn register_handler(&mut self, _: InterruptLine, _: &'static PulseCounter) {}
//! #     fn clear_handler(&mut self, _: InterruptLine) {}
//! #     fn bind_interrupt(&mut self, _: InterruptLine, _: Edge) {}
//! #     fn unbind_interrupt(&mut self, _: InterruptLine) {}
//! # }
//!
//! static TACH: PulseCounter = PulseCounter::new();
//!
//! // 20-slot encoder disc on pin 2
//! let mut sensor = RotationSensor::new(BoardHal, &TACH, 2, 20);
//! sensor.enable().expect("pin 2 is interrupt-capable");
//!
//! match sensor.read_rpm() {
//!     Some(rpm) => { /* valid reading, 0.0 until two pulses arrive */ }
//!     None => { /* sensor disabled */ }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod capture;
pub mod counter;
pub mod dispatch;
pub mod errors;
pub mod reading;
pub mod sensor;
pub mod time;
pub mod traits;

// Public API
pub use counter::PulseCounter;
pub use dispatch::DispatchTable;
pub use errors::{SensorError, SensorResult};
pub use reading::CountSnapshot;
pub use sensor::RotationSensor;
pub use time::{Clock, Timestamp};
pub use traits::{ChannelId, Edge, InterruptLine, SensorHal};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
