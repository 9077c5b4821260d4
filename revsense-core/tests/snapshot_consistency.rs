//! Snapshot consistency under concurrent mutation
//!
//! The counter's one ordering contract: a snapshot reflects either the
//! pre- or post-pulse state of all three fields together, never a mix.
//! On target that is guaranteed by interrupt suppression; on the host the
//! `critical-section` std implementation gives the same atomicity across
//! real threads, so these tests hammer the counter from one thread while
//! snapshotting from another and check that no torn state is ever
//! observable. A proptest model check then replays randomized
//! pulse/reset/snapshot sequences (wrapping timestamps included) against
//! a reference model.

#![cfg(test)]

use std::sync::atomic::{AtomicBool, Ordering};

use proptest::prelude::*;

use revsense_core::PulseCounter;

/// Pulses land at exact multiples of STEP, so in any consistent snapshot
/// the timestamps are a pure function of the count. A torn read breaks
/// the relation.
#[test]
fn concurrent_snapshots_are_never_torn() {
    const PULSES: u32 = 50_000;
    const STEP: u32 = 1000;

    let counter = PulseCounter::new();
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for k in 1..=PULSES {
                counter.on_pulse(k * STEP);
            }
            done.store(true, Ordering::Release);
        });

        scope.spawn(|| {
            while !done.load(Ordering::Acquire) {
                let snap = counter.snapshot(2, 20);

                assert!(snap.count <= PULSES);
                if snap.count > 0 {
                    assert_eq!(
                        snap.last_count_time,
                        snap.count * STEP,
                        "timestamp does not belong to the counted pulse"
                    );
                }
                match snap.count {
                    0 | 1 => assert_eq!(snap.last_interval, 0),
                    _ => assert_eq!(
                        snap.last_interval, STEP,
                        "interval mixes timestamps from different pulses"
                    ),
                }
            }
        });
    });

    let final_snap = counter.snapshot(2, 20);
    assert_eq!(final_snap.count, PULSES);
    assert_eq!(final_snap.last_count_time, PULSES * STEP);
    assert_eq!(final_snap.last_interval, STEP);
}

#[derive(Debug, Clone)]
enum Op {
    /// Advance the clock by this many microseconds, then pulse.
    Pulse(u32),
    Reset,
    Snapshot,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u32..100_000).prop_map(Op::Pulse),
        1 => Just(Op::Reset),
        2 => Just(Op::Snapshot),
    ]
}

proptest! {
    #[test]
    fn snapshots_match_a_reference_model(
        start in any::<u32>(),
        ops in proptest::collection::vec(op_strategy(), 1..200),
    ) {
        let counter = PulseCounter::new();

        // Reference model: the documented state transitions applied directly.
        let mut now = start;
        let mut count = 0u32;
        let mut last = 0u32;
        let mut prev = 0u32;

        for op in &ops {
            match op {
                Op::Pulse(dt) => {
                    now = now.wrapping_add(*dt);
                    prev = last;
                    last = now;
                    count = count.wrapping_add(1);
                    counter.on_pulse(now);
                }
                Op::Reset => {
                    count = 0;
                    last = 0;
                    prev = 0;
                    counter.reset();
                }
                Op::Snapshot => {
                    let snap = counter.snapshot(2, 20);
                    prop_assert_eq!(snap.count, count);
                    prop_assert_eq!(snap.last_count_time, last);

                    let expected_interval =
                        if prev == 0 { 0 } else { last.wrapping_sub(prev) };
                    prop_assert_eq!(snap.last_interval, expected_interval);

                    // An interval implies at least two pulses were seen.
                    if snap.last_interval != 0 {
                        prop_assert!(snap.count >= 2);
                    }

                    // Derived values stay total and sane.
                    prop_assert!(snap.rpm() >= 0.0);
                    prop_assert!(snap.rpm().is_finite());
                    prop_assert!(snap.revolutions() >= 0.0);
                }
            }
        }
    }
}
