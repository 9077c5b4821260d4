//! Error Types for Sensor Lifecycle Failures
//!
//! ## Design Philosophy
//!
//! The error surface of this crate is intentionally tiny:
//!
//! 1. **Small Size**: errors are `Copy` and carry only inline data — no
//!    `String`, no heap — so they can be returned from hot mainline paths
//!    and stored in queues on constrained targets.
//!
//! 2. **Mainline Only**: the interrupt path performs unconditional field
//!    updates and has no failure mode; errors can only arise from
//!    mainline-context entry points, and nothing here is fatal to the host.
//!
//! 3. **Not-enabled is not an error**: polling a disabled sensor is an
//!    expected usage pattern, so the read API reports it as `None`
//!    (see [`crate::sensor::RotationSensor`]) rather than through this enum.
//!
//! The worst outcome of misuse is a sensor that never reports enabled or
//! never advances its count — never a panic.

use thiserror_no_std::Error;

use crate::traits::ChannelId;

/// Result type for sensor lifecycle operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Sensor lifecycle errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The configured channel has no interrupt-capable line.
    ///
    /// Detected at construction, surfaced on every enable attempt. The
    /// sensor stays permanently non-functional but the rest of the system
    /// is unaffected.
    #[error("Channel {channel} has no usable interrupt line")]
    InvalidChannel {
        /// The channel (pin) that could not be mapped to an interrupt line
        channel: ChannelId,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidChannel { channel } => {
                defmt::write!(fmt, "Channel {} has no usable interrupt line", channel)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_copy_and_comparable() {
        let e = SensorError::InvalidChannel { channel: 7 };
        let f = e;
        assert_eq!(e, f);
    }
}
