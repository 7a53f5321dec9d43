//! Unit tests for the release gate

use super::*;
use ntest::timeout;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_single_party_gate_trips_immediately() {
    let gate = ReleaseGate::new(1);
    assert!(gate.wait().unwrap().is_leader());
    assert_eq!(gate.generation(), 1);
}

#[test]
#[should_panic(expected = "at least one party")]
fn test_zero_parties_panics() {
    let _ = ReleaseGate::new(0);
}

#[test]
#[timeout(10000)]
fn test_all_parties_released_together() {
    let parties = 8;
    let gate = Arc::new(ReleaseGate::new(parties));
    let released = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..parties - 1)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let released = Arc::clone(&released);
            thread::spawn(move || {
                let result = gate.wait().unwrap();
                released.fetch_add(1, Ordering::SeqCst);
                result.is_leader()
            })
        })
        .collect();

    // Nobody gets out before the final arrival.
    while gate.waiting() < parties - 1 {
        thread::yield_now();
    }
    thread::sleep(Duration::from_millis(100));
    assert_eq!(released.load(Ordering::SeqCst), 0);
    assert_eq!(gate.generation(), 0);

    let final_arrival = gate.wait().unwrap();

    let mut leaders = if final_arrival.is_leader() { 1 } else { 0 };
    for handle in handles {
        if handle.join().unwrap() {
            leaders += 1;
        }
    }

    assert_eq!(released.load(Ordering::SeqCst), parties - 1);
    assert_eq!(leaders, 1);
    assert_eq!(gate.generation(), 1);
    assert_eq!(gate.waiting(), 0);
}

#[test]
#[timeout(10000)]
fn test_gate_is_cyclic() {
    let gate = Arc::new(ReleaseGate::new(2));

    for cycle in 0..3 {
        let partner = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait().unwrap())
        };
        gate.wait().unwrap();
        partner.join().unwrap();
        assert_eq!(gate.generation(), cycle + 1);
    }
}

#[test]
#[timeout(10000)]
fn test_break_releases_all_waiters_with_error() {
    let parties = 4;
    let gate = Arc::new(ReleaseGate::new(parties));

    let handles: Vec<_> = (0..parties - 1)
        .map(|_| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait())
        })
        .collect();

    // Let the waiters block before breaking.
    while gate.waiting() < parties - 1 {
        thread::yield_now();
    }
    gate.break_gate();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Err(Error::GateFailure));
    }
    assert!(gate.is_broken());
}

#[test]
fn test_broken_gate_fails_later_arrivals() {
    let gate = ReleaseGate::new(3);
    gate.break_gate();
    assert_eq!(gate.wait(), Err(Error::GateFailure));

    // Breaking again is a no-op.
    gate.break_gate();
    assert!(gate.is_broken());
}

#[test]
#[timeout(10000)]
fn test_completed_cycle_unaffected_by_later_break() {
    let gate = Arc::new(ReleaseGate::new(2));

    let partner = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || gate.wait())
    };
    assert!(gate.wait().is_ok());
    assert!(partner.join().unwrap().is_ok());

    // The break only affects parties that arrive afterwards.
    gate.break_gate();
    assert_eq!(gate.generation(), 1);
    assert_eq!(gate.wait(), Err(Error::GateFailure));
}
