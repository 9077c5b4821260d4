//! Time handling for pulse measurement
//!
//! The counting engine timestamps every pulse with a monotonic microsecond
//! clock. Interval math (and therefore RPM) only ever looks at differences
//! between two timestamps, so the epoch is irrelevant — what matters is
//! monotonicity and resolution.
//!
//! Timestamps are deliberately `u32`: hardware microsecond counters are
//! almost always 32-bit and wrap (roughly every 71 minutes), and two
//! wrapped timestamps still subtract to the correct interval as long as
//! the interval itself fits in 32 bits. All interval arithmetic in this
//! crate uses `wrapping_sub` for that reason.

/// Timestamp in microseconds from a monotonic clock.
///
/// Wraps on overflow; `0` is reserved by the counter to mean "no pulse
/// recorded yet", so clock implementations should avoid returning exactly
/// `0` when a pulse is genuinely being timed (in practice the first tick
/// after boot is already non-zero).
pub type Timestamp = u32;

/// Monotonic microsecond clock.
///
/// The platform glue reads this from its interrupt trampoline to timestamp
/// each pulse before forwarding to [`crate::counter::PulseCounter::on_pulse`].
/// Implementations typically wrap a free-running hardware timer.
pub trait Clock {
    /// Current monotonic time in microseconds. Wraps on overflow.
    fn now_us(&self) -> Timestamp;
}

/// Controllable clock for tests.
///
/// Starts at a caller-chosen instant and only moves when told to, which
/// makes interval assertions exact.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Timestamp,
}

impl FixedClock {
    /// Create a clock frozen at `now` microseconds.
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    /// Jump to an absolute time.
    pub fn set(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Advance by `us` microseconds, wrapping like the hardware counter.
    pub fn advance(&mut self, us: u32) {
        self.now = self.now.wrapping_add(us);
    }
}

impl Clock for FixedClock {
    fn now_us(&self) -> Timestamp {
        self.now
    }
}

/// Process-monotonic clock for host builds (requires `std`).
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Clock counting microseconds since its own construction.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> Timestamp {
        // Truncating to u32 reproduces the wrap behavior of a 32-bit
        // hardware counter.
        self.start.elapsed().as_micros() as Timestamp
    }
}
