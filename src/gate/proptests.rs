//! Property-based tests for the release gate using proptest
//!
//! These tests verify the all-or-nothing release invariant across a range of
//! party counts and cycle counts.

use super::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_every_party_released_exactly_once(workers in 1usize..8) {
        let gate = Arc::new(ReleaseGate::new(workers + 1));
        let released = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let released = Arc::clone(&released);
                thread::spawn(move || {
                    gate.wait().unwrap();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        gate.wait().unwrap();
        for handle in handles {
            handle.join().unwrap();
        }

        prop_assert_eq!(released.load(Ordering::SeqCst), workers);
        prop_assert_eq!(gate.generation(), 1);
        prop_assert!(!gate.is_broken());
    }

    #[test]
    fn test_generation_counts_cycles(workers in 1usize..4, cycles in 1u64..4) {
        let gate = Arc::new(ReleaseGate::new(workers + 1));

        for _ in 0..cycles {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let gate = Arc::clone(&gate);
                    thread::spawn(move || gate.wait().unwrap())
                })
                .collect();

            let leaders = std::iter::once(gate.wait().unwrap())
                .chain(handles.into_iter().map(|h| h.join().unwrap()))
                .filter(WaitResult::is_leader)
                .count();
            prop_assert_eq!(leaders, 1);
        }

        prop_assert_eq!(gate.generation(), cycles);
    }

    #[test]
    fn test_break_fails_every_waiter(workers in 1usize..8) {
        let gate = Arc::new(ReleaseGate::new(workers + 1));

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || gate.wait())
            })
            .collect();

        while gate.waiting() < workers {
            thread::yield_now();
        }
        gate.break_gate();

        for handle in handles {
            prop_assert_eq!(handle.join().unwrap(), Err(Error::GateFailure));
        }
        prop_assert_eq!(gate.wait(), Err(Error::GateFailure));
    }
}
