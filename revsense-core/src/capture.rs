//! Fixed-Size Pulse Capture Ring
//!
//! ## Overview
//!
//! Diagnostics aid for bench bring-up: with the `capture` feature enabled,
//! the counter records the timestamp and running count of each pulse into
//! a fixed-size ring that overwrites its oldest entry when full. Dumping
//! the ring after a test run shows exactly when the last N pulses landed,
//! which is the quickest way to spot contact bounce or a miswired encoder.
//!
//! ## Design Rationale
//!
//! The ring is written from interrupt context, so it must be cheap and
//! allocation-free:
//!
//! - O(1) push, overwriting the oldest entry when full — recent pulses
//!   are the valuable ones
//! - fixed memory, sized at compile time through a const generic
//! - `const fn new()` so it can sit inside a `static` counter
//!
//! It is not interrupt-safe by itself; [`crate::counter::PulseCounter`]
//! guards it with the same critical-section discipline as the count
//! state.

use crate::time::Timestamp;

/// Ring depth used by [`crate::counter::PulseCounter`]'s capture trace.
pub const CAPTURE_DEPTH: usize = 32;

/// One captured pulse: when it landed and what the count became.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureEntry {
    /// Monotonic microsecond timestamp of the pulse.
    pub timestamp: Timestamp,
    /// Pulse count immediately after this pulse was recorded.
    pub count: u32,
}

/// Fixed-size overwrite-oldest ring of [`CaptureEntry`] values.
///
/// Maintains chronological order under iteration. `N` should be a power
/// of two so the wrap arithmetic compiles to a mask.
#[derive(Debug, Clone)]
pub struct CaptureRing<const N: usize> {
    entries: [Option<CaptureEntry>; N],
    /// Next slot to write; always < N.
    write_pos: usize,
    /// Number of valid entries; never exceeds N.
    len: usize,
}

impl<const N: usize> CaptureRing<N> {
    /// Create an empty ring.
    pub const fn new() -> Self {
        Self {
            entries: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Append an entry, overwriting the oldest when full.
    pub fn push(&mut self, entry: CaptureEntry) {
        self.entries[self.write_pos] = Some(entry);
        self.write_pos = (self.write_pos + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Most recently pushed entry, if any.
    pub fn last(&self) -> Option<CaptureEntry> {
        if self.len == 0 {
            return None;
        }
        let idx = (self.write_pos + N - 1) % N;
        self.entries[idx]
    }

    /// Number of valid entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no pulses have been captured.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.entries = [None; N];
        self.write_pos = 0;
        self.len = 0;
    }

    /// Iterate entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = CaptureEntry> + '_ {
        let start = if self.len < N {
            0
        } else {
            self.write_pos
        };
        (0..self.len).filter_map(move |i| self.entries[(start + i) % N])
    }
}

impl<const N: usize> Default for CaptureRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(t: Timestamp, c: u32) -> CaptureEntry {
        CaptureEntry {
            timestamp: t,
            count: c,
        }
    }

    #[test]
    fn empty_ring() {
        let ring: CaptureRing<4> = CaptureRing::new();
        assert!(ring.is_empty());
        assert_eq!(ring.last(), None);
        assert_eq!(ring.iter().count(), 0);
    }

    #[test]
    fn partial_fill_keeps_order() {
        let mut ring: CaptureRing<4> = CaptureRing::new();
        ring.push(entry(100, 1));
        ring.push(entry(200, 2));

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.last(), Some(entry(200, 2)));

        let times: heapless::Vec<Timestamp, 4> = ring.iter().map(|e| e.timestamp).collect();
        assert_eq!(&times[..], &[100, 200]);
    }

    #[test]
    fn overwrites_oldest_when_full() {
        let mut ring: CaptureRing<4> = CaptureRing::new();
        for i in 1..=6u32 {
            ring.push(entry(i * 100, i));
        }

        assert_eq!(ring.len(), 4);
        let counts: heapless::Vec<u32, 4> = ring.iter().map(|e| e.count).collect();
        assert_eq!(&counts[..], &[3, 4, 5, 6]);
        assert_eq!(ring.last(), Some(entry(600, 6)));
    }

    #[test]
    fn clear_empties_the_ring() {
        let mut ring: CaptureRing<4> = CaptureRing::new();
        ring.push(entry(100, 1));
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.last(), None);
    }
}
