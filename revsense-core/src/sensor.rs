//! Rotation Sensor Controller
//!
//! [`RotationSensor`] wraps one [`PulseCounter`] with the enable/disable
//! lifecycle and the read API. It owns the immutable configuration
//! (channel, resolution, resolved interrupt line) and drives the platform
//! glue through [`SensorHal`] — it is the only code allowed to mutate a
//! dispatch-table entry, and it sequences those mutations against
//! interrupt arming so no pulse is ever attributed to a stale or absent
//! counter.
//!
//! ## State Machine
//!
//! ```text
//!              construction
//!                   │
//!      no interrupt line?──────► Invalid (every enable rejected)
//!                   │
//!                   ▼
//!               Disabled ◄──────────────┐
//!                   │                   │
//!         enable: reset counter,        │ disable: unbind interrupt,
//!         register handler,             │ clear handler
//!         bind interrupt                │ (state frozen, not reset)
//!                   │                   │
//!                   ▼                   │
//!                Enabled ───────────────┘
//! ```
//!
//! Redundant transitions (enable while enabled, disable while disabled)
//! are no-ops that leave the counters untouched.
//!
//! ## Reads
//!
//! Reads are valid in any state. Polling a disabled sensor is expected
//! usage, not an error, so the read methods return `Option`: `None` means
//! "no reading available", distinguishable from every valid measurement
//! (a stopped but enabled sensor reads `Some(0.0)` RPM, not `None`).

use crate::counter::PulseCounter;
use crate::errors::{SensorError, SensorResult};
use crate::reading::CountSnapshot;
use crate::traits::{ChannelId, Edge, InterruptLine, SensorHal};

/// Interrupt-driven rotation sensor with an enable/disable lifecycle.
///
/// The counter must be a `static` so the platform's interrupt trampoline
/// can reach it; the sensor itself is ordinary mainline-owned data.
///
/// ```no_run
/// use revsense_core::{PulseCounter, RotationSensor};
/// # use revsense_core::traits::{ChannelId, Edge, InterruptLine, SensorHal};
/// # struct BoardHal;
/// # impl SensorHal for BoardHal {
/// #     fn interrupt_line(&self, _: ChannelId) -> Option<InterruptLine> { Some(0) }
/// #     fn configure_input(&mut self, _: ChannelId) {}
/// #     fn register_handler(&mut self, _: InterruptLine, _: &'static PulseCounter) {}
/// #     fn clear_handler(&mut self, _: InterruptLine) {}
/// #     fn bind_interrupt(&mut self, _: InterruptLine, _: Edge) {}
/// #     fn unbind_interrupt(&mut self, _: InterruptLine) {}
/// # }
///
/// static TACH: PulseCounter = PulseCounter::new();
///
/// let mut sensor = RotationSensor::new(BoardHal, &TACH, 2, 20);
/// sensor.enable()?;
///
/// // ... pulses arrive via the interrupt trampoline ...
///
/// if let Some(rpm) = sensor.read_rpm() {
///     // use the reading
/// }
/// # Ok::<(), revsense_core::SensorError>(())
/// ```
pub struct RotationSensor<H: SensorHal> {
    counter: &'static PulseCounter,
    hal: H,
    channel: ChannelId,
    pulses_per_rev: u32,
    line: Option<InterruptLine>,
    enabled: bool,
}

impl<H: SensorHal> RotationSensor<H> {
    /// Create a sensor on `channel` with the given resolution.
    ///
    /// A non-positive `pulses_per_rev` is clamped to 1, keeping the rate
    /// math total. The interrupt line is resolved once here; a channel
    /// with no interrupt-capable line yields a permanently non-functional
    /// sensor (every enable attempt returns
    /// [`SensorError::InvalidChannel`]), not a construction failure.
    pub fn new(
        mut hal: H,
        counter: &'static PulseCounter,
        channel: ChannelId,
        pulses_per_rev: i32,
    ) -> Self {
        let line = hal.interrupt_line(channel);
        if line.is_some() {
            hal.configure_input(channel);
        }

        Self {
            counter,
            hal,
            channel,
            pulses_per_rev: pulses_per_rev.max(1) as u32,
            line,
            enabled: false,
        }
    }

    /// Zero the pulse count and timestamps. Valid in any state.
    pub fn reset(&self) {
        self.counter.reset();
    }

    /// Enable or disable pulse counting.
    ///
    /// Enabling resets the counter, so counting always starts from zero.
    /// The handler is registered in the dispatch table *before* the
    /// interrupt is armed; disabling disarms *before* clearing, so a
    /// pulse racing either transition lands on a live counter or nowhere.
    ///
    /// Redundant calls are no-ops.
    pub fn set_enabled(&mut self, on: bool) -> SensorResult<()> {
        let Some(line) = self.line else {
            #[cfg(feature = "log")]
            log::warn!(
                "rotation sensor on channel {} rejected: no usable interrupt line",
                self.channel
            );
            return Err(SensorError::InvalidChannel {
                channel: self.channel,
            });
        };

        if on && !self.enabled {
            self.counter.reset();
            self.hal.register_handler(line, self.counter);
            self.hal.bind_interrupt(line, Edge::Rising);
            self.enabled = true;
        } else if !on && self.enabled {
            self.hal.unbind_interrupt(line);
            self.hal.clear_handler(line);
            self.enabled = false;
        }

        Ok(())
    }

    /// Shorthand for `set_enabled(true)`.
    pub fn enable(&mut self) -> SensorResult<()> {
        self.set_enabled(true)
    }

    /// Shorthand for `set_enabled(false)`. The measurement state is left
    /// frozen at its last values, not reset.
    pub fn disable(&mut self) -> SensorResult<()> {
        self.set_enabled(false)
    }

    /// True when counting is active.
    pub fn is_enabled(&self) -> bool {
        self.line.is_some() && self.enabled
    }

    /// Sensor resolution in pulses per revolution (always >= 1).
    pub fn resolution(&self) -> u32 {
        self.pulses_per_rev
    }

    /// The channel (pin) this sensor is attached to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel
    }

    /// Full count snapshot, or `None` while disabled.
    pub fn read(&self) -> Option<CountSnapshot> {
        if !self.is_enabled() {
            return None;
        }
        Some(self.counter.snapshot(self.channel, self.pulses_per_rev))
    }

    /// Pulses counted since the last reset, or `None` while disabled.
    pub fn read_count(&self) -> Option<u32> {
        self.read().map(|snap| snap.count)
    }

    /// Instantaneous RPM, or `None` while disabled.
    ///
    /// A rate needs two pulses: until the second pulse after a reset this
    /// reads `Some(0.0)`, which also covers a stopped rotor.
    pub fn read_rpm(&self) -> Option<f32> {
        self.read().map(|snap| snap.rpm())
    }

    /// Revolutions since the last reset, or `None` while disabled.
    pub fn read_revolutions(&self) -> Option<f32> {
        self.read().map(|snap| snap.revolutions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// HAL for a channel with no interrupt capability.
    struct DeadHal;

    impl SensorHal for DeadHal {
        fn interrupt_line(&self, _: ChannelId) -> Option<InterruptLine> {
            None
        }
        fn configure_input(&mut self, _: ChannelId) {
            panic!("must not configure a pin without an interrupt line");
        }
        fn register_handler(&mut self, _: InterruptLine, _: &'static PulseCounter) {}
        fn clear_handler(&mut self, _: InterruptLine) {}
        fn bind_interrupt(&mut self, _: InterruptLine, _: Edge) {}
        fn unbind_interrupt(&mut self, _: InterruptLine) {}
    }

    #[test]
    fn non_positive_resolution_clamps_to_one() {
        static TACH: PulseCounter = PulseCounter::new();
        for ppr in [-5, 0, 1] {
            let sensor = RotationSensor::new(DeadHal, &TACH, 2, ppr);
            assert!(sensor.resolution() >= 1);
        }
        assert_eq!(RotationSensor::new(DeadHal, &TACH, 2, 20).resolution(), 20);
    }

    #[test]
    fn invalid_channel_rejects_every_enable() {
        static TACH: PulseCounter = PulseCounter::new();
        let mut sensor = RotationSensor::new(DeadHal, &TACH, 9, 20);

        assert_eq!(
            sensor.enable(),
            Err(SensorError::InvalidChannel { channel: 9 })
        );
        assert!(!sensor.is_enabled());
        assert_eq!(sensor.read(), None);
        assert_eq!(sensor.read_rpm(), None);
    }
}
