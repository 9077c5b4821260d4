//! Derived Rotation Readings
//!
//! [`CountSnapshot`] is a consistent, copied view of the counter state at
//! one instant, plus the immutable sensor configuration. Because it is a
//! value decoupled from the live state, the derived computations here —
//! RPM and revolution count — need no synchronization and are pure
//! functions of the snapshot.

use crate::counter::PulseState;
use crate::time::Timestamp;
use crate::traits::ChannelId;

/// Consistent copy of a sensor's count state at a single instant.
///
/// Produced by [`crate::counter::PulseCounter::snapshot`]. The three
/// measurement fields always belong to the same instant: `count` pulses
/// had occurred, the latest at `last_count_time`, the previous
/// `last_interval` microseconds earlier (`0` when fewer than two pulses
/// have been seen since reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountSnapshot {
    /// Channel (pin) the owning sensor is attached to.
    pub channel: ChannelId,
    /// Sensor resolution in pulses per revolution, always >= 1.
    pub pulses_per_rev: u32,
    /// Pulses counted since the last reset.
    pub count: u32,
    /// Timestamp of the most recent pulse, 0 if none since reset.
    pub last_count_time: Timestamp,
    /// Microseconds between the two most recent pulses, 0 if fewer than
    /// two pulses have been seen since reset.
    pub last_interval: u32,
}

impl CountSnapshot {
    pub(crate) fn from_state(
        channel: ChannelId,
        pulses_per_rev: u32,
        state: PulseState,
    ) -> Self {
        // Wrapping subtraction: timestamps come from a 32-bit microsecond
        // counter that rolls over about every 71 minutes.
        let last_interval = if state.prev_pulse == 0 {
            0
        } else {
            state.last_pulse.wrapping_sub(state.prev_pulse)
        };

        Self {
            channel,
            pulses_per_rev,
            count: state.count,
            last_count_time: state.last_pulse,
            last_interval,
        }
    }

    /// Instantaneous rotation rate in revolutions per minute.
    ///
    /// Derived from the interval between the two most recent pulses, so
    /// it needs at least two pulses since reset: until then (slow or
    /// stationary rotation included) this returns `0.0`.
    pub fn rpm(&self) -> f32 {
        if self.last_interval == 0 {
            return 0.0;
        }
        // pulses/us -> rev/min: one pulse per `last_interval` us, scaled
        // by resolution.
        60_000_000.0 / (self.last_interval as f32 * self.pulses_per_rev as f32)
    }

    /// Revolutions accumulated since the last reset.
    ///
    /// Fractional: a sensor with 20 pulses/rev reports 0.05 rev per
    /// pulse.
    pub fn revolutions(&self) -> f32 {
        self.count as f32 / self.pulses_per_rev as f32
    }
}
