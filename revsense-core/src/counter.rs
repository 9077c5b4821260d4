//! Interrupt-Safe Pulse Counting Engine
//!
//! ## Overview
//!
//! [`PulseCounter`] is the one piece of state shared between interrupt
//! context and mainline code: the pulse count plus the timestamps of the
//! two most recent pulses. The interrupt trampoline calls
//! [`PulseCounter::on_pulse`]; everything else only ever reads, through
//! [`PulseCounter::snapshot`].
//!
//! ## The Tearing Hazard
//!
//! A pulse interrupt can preempt mainline code between any two
//! instructions. If a reader picked up `count` and then got preempted
//! before reading `last_pulse`, the resulting interval would pair
//! timestamps from different pulses and the derived RPM would be garbage.
//! The classic C fix is `volatile` fields bracketed by `cli()`/`sei()`;
//! here the same discipline is an explicit construct: all three fields
//! live in one plain value struct inside a
//! [`critical_section::Mutex`], and `reset`, `on_pulse`, and `snapshot`
//! each touch it inside a single `critical_section::with` region.
//!
//! ## Bounded Critical Sections
//!
//! Every guarded region is a fixed handful of word reads/writes — no
//! loops, no I/O, no formatting. Interrupts are suppressed for tens of
//! cycles at worst, so calling `snapshot()` at high frequency from
//! mainline code is fine.
//!
//! ## Scheduling Model
//!
//! This guards single-core interrupt-vs-mainline preemption, the only
//! hazard on the targeted MCU class. On hosted test builds the `std`
//! critical-section implementation degrades to a global lock, which keeps
//! the same atomicity contract across real threads.

use core::cell::Cell;

use critical_section::Mutex;

use crate::reading::CountSnapshot;
use crate::time::Timestamp;
use crate::traits::ChannelId;

#[cfg(feature = "capture")]
use core::cell::RefCell;

#[cfg(feature = "capture")]
use crate::capture::{CaptureEntry, CaptureRing, CAPTURE_DEPTH};

/// The three fields the interrupt handler mutates, as one plain value.
///
/// Kept `Copy` so the whole struct moves in and out of its guarded cell
/// in one shot — there is never a moment where only some fields have been
/// updated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PulseState {
    /// Pulses counted since the last reset. Wraps on overflow.
    pub(crate) count: u32,
    /// Timestamp of the most recent pulse; 0 = no pulse since reset.
    pub(crate) last_pulse: Timestamp,
    /// Timestamp of the pulse before that; 0 = fewer than two pulses.
    pub(crate) prev_pulse: Timestamp,
}

impl PulseState {
    const ZERO: Self = Self {
        count: 0,
        last_pulse: 0,
        prev_pulse: 0,
    };
}

/// Pulse count and timing state shared with the interrupt handler.
///
/// `const`-constructible so instances can live in `static`s reachable
/// from the platform's interrupt trampolines:
///
/// ```
/// use revsense_core::counter::PulseCounter;
///
/// static TACH: PulseCounter = PulseCounter::new();
///
/// // interrupt trampoline (platform glue):
/// TACH.on_pulse(26_000);
///
/// // mainline:
/// let snap = TACH.snapshot(2, 20);
/// assert_eq!(snap.count, 1);
/// ```
pub struct PulseCounter {
    state: Mutex<Cell<PulseState>>,
    #[cfg(feature = "capture")]
    trace: Mutex<RefCell<CaptureRing<CAPTURE_DEPTH>>>,
}

impl PulseCounter {
    /// Create a counter with zeroed state.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(PulseState::ZERO)),
            #[cfg(feature = "capture")]
            trace: Mutex::new(RefCell::new(CaptureRing::new())),
        }
    }

    /// Zero the count and both pulse timestamps.
    ///
    /// Runs as one atomic unit with respect to [`PulseCounter::on_pulse`],
    /// so a pulse landing mid-reset can never leave a half-cleared state.
    /// Callable from any mainline context; no failure mode.
    pub fn reset(&self) {
        critical_section::with(|cs| {
            self.state.borrow(cs).set(PulseState::ZERO);
            #[cfg(feature = "capture")]
            self.trace.borrow_ref_mut(cs).clear();
        });
    }

    /// Record one pulse at time `now`.
    ///
    /// Interrupt-context mutator: shifts the timestamp pair and bumps the
    /// count, unconditionally. No validation, no logging, nothing that
    /// could fail — failures never cross into the interrupt path.
    pub fn on_pulse(&self, now: Timestamp) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut s = cell.get();
            s.prev_pulse = s.last_pulse;
            s.last_pulse = now;
            s.count = s.count.wrapping_add(1);
            cell.set(s);

            #[cfg(feature = "capture")]
            self.trace.borrow_ref_mut(cs).push(CaptureEntry {
                timestamp: now,
                count: s.count,
            });
        });
    }

    /// Take a consistent copy of the measurement state.
    ///
    /// All three fields are read under the same suppression discipline
    /// the mutator writes them under, so the returned snapshot always
    /// reflects a single instant — either wholly before or wholly after
    /// any concurrent pulse, never a mix.
    ///
    /// `channel` and `pulses_per_rev` are the immutable configuration of
    /// the owning sensor; they ride along in the snapshot so derived
    /// values need no further access to the sensor.
    pub fn snapshot(&self, channel: ChannelId, pulses_per_rev: u32) -> CountSnapshot {
        let state = critical_section::with(|cs| self.state.borrow(cs).get());
        CountSnapshot::from_state(channel, pulses_per_rev, state)
    }

    /// Copy out the capture ring, oldest entry first.
    ///
    /// One bounded critical section; the returned vector is decoupled
    /// from the live ring.
    #[cfg(feature = "capture")]
    pub fn capture_dump(&self) -> heapless::Vec<CaptureEntry, CAPTURE_DEPTH> {
        critical_section::with(|cs| {
            let ring = self.trace.borrow_ref(cs);
            let mut out = heapless::Vec::new();
            for entry in ring.iter() {
                // Ring and Vec share the same capacity; push cannot fail.
                let _ = out.push(entry);
            }
            out
        })
    }
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let counter = PulseCounter::new();
        let snap = counter.snapshot(0, 1);
        assert_eq!(snap.count, 0);
        assert_eq!(snap.last_count_time, 0);
        assert_eq!(snap.last_interval, 0);
    }

    #[test]
    fn single_pulse_has_no_interval() {
        let counter = PulseCounter::new();
        counter.on_pulse(1000);

        let snap = counter.snapshot(0, 1);
        assert_eq!(snap.count, 1);
        assert_eq!(snap.last_count_time, 1000);
        assert_eq!(snap.last_interval, 0);
    }

    #[test]
    fn two_pulses_yield_their_interval() {
        let counter = PulseCounter::new();
        counter.on_pulse(1000);
        counter.on_pulse(26_000);

        let snap = counter.snapshot(2, 20);
        assert_eq!(snap.count, 2);
        assert_eq!(snap.last_count_time, 26_000);
        assert_eq!(snap.last_interval, 25_000);
        assert_eq!(snap.channel, 2);
        assert_eq!(snap.pulses_per_rev, 20);
    }

    #[test]
    fn reset_zeroes_everything() {
        let counter = PulseCounter::new();
        counter.on_pulse(1000);
        counter.on_pulse(2000);
        counter.reset();

        let snap = counter.snapshot(0, 1);
        assert_eq!(snap.count, 0);
        assert_eq!(snap.last_count_time, 0);
        assert_eq!(snap.last_interval, 0);
    }

    #[test]
    fn interval_survives_timestamp_wraparound() {
        let counter = PulseCounter::new();
        let t1 = u32::MAX - 1000;
        let t2 = t1.wrapping_add(25_000);
        counter.on_pulse(t1);
        counter.on_pulse(t2);

        let snap = counter.snapshot(0, 1);
        assert_eq!(snap.last_interval, 25_000);
    }

    #[test]
    fn count_wraps_without_panicking() {
        let counter = PulseCounter::new();
        critical_section::with(|cs| {
            counter.state.borrow(cs).set(PulseState {
                count: u32::MAX,
                last_pulse: 500,
                prev_pulse: 100,
            });
        });
        counter.on_pulse(900);
        assert_eq!(counter.snapshot(0, 1).count, 0);
    }

    #[cfg(feature = "capture")]
    #[test]
    fn capture_records_recent_pulses() {
        let counter = PulseCounter::new();
        for i in 1..=5u32 {
            counter.on_pulse(i * 100);
        }

        let dump = counter.capture_dump();
        assert_eq!(dump.len(), 5);
        assert_eq!(dump[0].timestamp, 100);
        assert_eq!(dump[4].timestamp, 500);
        assert_eq!(dump[4].count, 5);

        counter.reset();
        assert!(counter.capture_dump().is_empty());
    }
}
