//! Platform Seam for Interrupt-Driven Sensors
//!
//! The counting engine never touches hardware directly. Everything
//! platform-specific — pin configuration, pin-to-interrupt-line mapping,
//! arming the interrupt controller, and the dispatch table that routes a
//! shared interrupt vector to the right counter — sits behind the
//! [`SensorHal`] trait, implemented once per platform by the glue layer.
//!
//! ## Design Philosophy
//!
//! Keeping the seam a trait (rather than `cfg`-gated platform code inside
//! the engine) buys the usual things:
//!
//! - **Testability**: host tests drive the full enable/disable state
//!   machine against a recording mock and assert call ordering.
//! - **Static Dispatch**: the sensor controller is generic over the HAL,
//!   so there is no vtable on the hot path.
//! - **Portability**: a new MCU means a new `SensorHal` impl, not a fork
//!   of the engine.
//!
//! ## Ordering Contract
//!
//! The controller calls these in a fixed order that the glue must honor:
//!
//! ```text
//! enable:  register_handler(line, counter)  then  bind_interrupt(line, Rising)
//! disable: unbind_interrupt(line)           then  clear_handler(line)
//! ```
//!
//! Registering before arming means a pulse can never fire into an empty
//! dispatch slot; unbinding before clearing means a live handler can never
//! chase a removed counter.

use crate::counter::PulseCounter;

/// Identifier of the physical input channel (typically a pin number).
pub type ChannelId = u8;

/// Hardware interrupt line (vector index) a channel maps to.
pub type InterruptLine = u8;

/// Signal edge that triggers a pulse count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Count on the rising edge (the default for optical/hall encoders).
    Rising,
    /// Count on the falling edge.
    Falling,
}

/// Platform glue consumed by [`crate::sensor::RotationSensor`].
///
/// Implementations wrap the MCU's GPIO and interrupt controller plus a
/// [`crate::dispatch::DispatchTable`] for vector routing. All methods are
/// called from mainline context only; none may block.
pub trait SensorHal {
    /// Map a channel to its interrupt line, or `None` if the channel is
    /// not interrupt-capable on this platform.
    fn interrupt_line(&self, channel: ChannelId) -> Option<InterruptLine>;

    /// Configure the channel's pin as a digital input.
    fn configure_input(&mut self, channel: ChannelId);

    /// Point the dispatch table entry for `line` at `counter`.
    ///
    /// Must complete before [`SensorHal::bind_interrupt`] arms the line.
    fn register_handler(&mut self, line: InterruptLine, counter: &'static PulseCounter);

    /// Clear the dispatch table entry for `line`.
    ///
    /// Only called after [`SensorHal::unbind_interrupt`] has disarmed the
    /// line.
    fn clear_handler(&mut self, line: InterruptLine);

    /// Arm the hardware interrupt for `line`, triggering on `edge`.
    fn bind_interrupt(&mut self, line: InterruptLine, edge: Edge);

    /// Disarm the hardware interrupt for `line`.
    fn unbind_interrupt(&mut self, line: InterruptLine);
}
