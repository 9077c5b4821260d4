//! Interrupt Dispatch Registry
//!
//! ## Overview
//!
//! MCUs deliver external interrupts through shared, numbered vectors with
//! no inherent way to tell which sensor instance a vector belongs to. The
//! platform glue therefore keeps a [`DispatchTable`]: a fixed-capacity
//! map from interrupt line to the counter that currently owns it. Each
//! supported line gets one trampoline in the glue, whose entire body is a
//! call to [`DispatchTable::dispatch`] with the line number and the
//! current clock reading.
//!
//! The counting engine never reads this table; it only exposes
//! [`crate::counter::PulseCounter::on_pulse`] for the table to forward
//! into. Registration and clearing happen exclusively through the sensor
//! controller's enable/disable transitions (via [`crate::traits::SensorHal`]),
//! in an order that guarantees a trampoline can never reach a counter
//! that is being torn down:
//!
//! ```text
//! enable:  table entry set  ->  interrupt armed
//! disable: interrupt disarmed  ->  table entry cleared
//! ```
//!
//! ## Atomicity
//!
//! Slots are updated under the same critical-section discipline as the
//! counter state, so a pulse landing during an enable/disable transition
//! sees either the old owner or the new one, never a torn pointer.
//!
//! ## Sizing
//!
//! `LINES` is the number of interrupt-capable lines on the platform —
//! 2 on classic AVR boards (INT0/INT1), more on ARM targets. Lines
//! outside the table are ignored by every operation.

use core::cell::Cell;

use critical_section::Mutex;

use crate::counter::PulseCounter;
use crate::time::Timestamp;
use crate::traits::InterruptLine;

type Slot = Mutex<Cell<Option<&'static PulseCounter>>>;

/// Fixed-capacity map from interrupt line to its active counter.
///
/// `const`-constructible so the glue can keep it in a `static`:
///
/// ```
/// use revsense_core::counter::PulseCounter;
/// use revsense_core::dispatch::DispatchTable;
///
/// static TABLE: DispatchTable<2> = DispatchTable::new();
/// static TACH: PulseCounter = PulseCounter::new();
///
/// // enable path (mainline):
/// TABLE.register(0, &TACH);
///
/// // trampoline for line 0 (interrupt context):
/// TABLE.dispatch(0, 26_000);
///
/// assert_eq!(TACH.snapshot(0, 1).count, 1);
/// ```
pub struct DispatchTable<const LINES: usize> {
    slots: [Slot; LINES],
}

impl<const LINES: usize> DispatchTable<LINES> {
    /// Create a table with every line unowned.
    pub const fn new() -> Self {
        const EMPTY: Slot = Mutex::new(Cell::new(None));
        Self {
            slots: [EMPTY; LINES],
        }
    }

    /// Point `line` at `counter`. Out-of-range lines are ignored.
    pub fn register(&self, line: InterruptLine, counter: &'static PulseCounter) {
        if let Some(slot) = self.slots.get(line as usize) {
            critical_section::with(|cs| slot.borrow(cs).set(Some(counter)));
        }
    }

    /// Remove the owner of `line`, if any.
    pub fn clear(&self, line: InterruptLine) {
        if let Some(slot) = self.slots.get(line as usize) {
            critical_section::with(|cs| slot.borrow(cs).set(None));
        }
    }

    /// Current owner of `line`, if any.
    pub fn handler(&self, line: InterruptLine) -> Option<&'static PulseCounter> {
        self.slots
            .get(line as usize)
            .and_then(|slot| critical_section::with(|cs| slot.borrow(cs).get()))
    }

    /// Trampoline entry: forward a pulse at time `now` to the owner of
    /// `line`.
    ///
    /// Returns `true` if a counter was registered and the pulse was
    /// counted. An unowned or out-of-range line is a silent no-op — a
    /// stray pulse during teardown must not fault.
    pub fn dispatch(&self, line: InterruptLine, now: Timestamp) -> bool {
        match self.handler(line) {
            Some(counter) => {
                counter.on_pulse(now);
                true
            }
            None => false,
        }
    }
}

impl<const LINES: usize> Default for DispatchTable<LINES> {
    fn default() -> Self {
        Self::new()
    }
}
