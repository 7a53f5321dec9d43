//! Release gate
//!
//! This module implements a cyclic rendezvous barrier: a fixed number of
//! parties block on [`ReleaseGate::wait`] until the last party arrives, at
//! which point all of them are released together and the gate resets for the
//! next cycle.
//!
//! ## Design
//!
//! The gate keeps its state (arrival count, cycle generation, broken flag)
//! behind a `parking_lot::Mutex`, with a `Condvar` for the actual blocking.
//! A waiter records the generation it arrived in and sleeps until either the
//! generation advances (normal release) or the gate is broken.
//!
//! ## Broken state
//!
//! [`ReleaseGate::break_gate`] moves the gate into a broken state: every
//! current waiter is woken with [`Error::GateFailure`] and every later arrival
//! fails immediately. There is no partial release; a cycle either trips for
//! everyone or fails for everyone. The broken state is sticky.
//!
//! ## Example
//!
//! ```rust
//! use gatemap::ReleaseGate;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let gate = Arc::new(ReleaseGate::new(4));
//!
//! let workers: Vec<_> = (0..3)
//!     .map(|_| {
//!         let gate = Arc::clone(&gate);
//!         thread::spawn(move || {
//!             gate.wait().unwrap();
//!         })
//!     })
//!     .collect();
//!
//! // The fourth arrival trips the gate and releases everyone.
//! gate.wait().unwrap();
//!
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! ```

use crate::{Error, Result};
use parking_lot::{Condvar, Mutex};

#[cfg(test)]
mod tests;

#[cfg(test)]
mod proptests;

/// Internal gate state, guarded by the mutex in [`ReleaseGate`].
#[derive(Debug)]
struct GateState {
    // Parties that have arrived in the current cycle
    arrived: usize,

    // Completed cycles; waiters use this to detect their release
    generation: u64,

    // Once set, never cleared
    broken: bool,
}

/// A cyclic rendezvous barrier for a fixed number of parties
///
/// The gate is constructed for an exact party count. Each party calls
/// [`wait`](ReleaseGate::wait) once per cycle; the call blocks until the final
/// party arrives, then all parties are released together and the gate is ready
/// for another cycle.
///
/// # Examples
///
/// ```rust
/// use gatemap::ReleaseGate;
///
/// let gate = ReleaseGate::new(1);
/// // A single-party gate trips immediately.
/// assert!(gate.wait().unwrap().is_leader());
/// ```
#[derive(Debug)]
pub struct ReleaseGate {
    parties: usize,
    state: Mutex<GateState>,
    release: Condvar,
}

/// Outcome of a successful [`ReleaseGate::wait`]
///
/// Exactly one party per cycle observes `is_leader() == true`: the one whose
/// arrival tripped the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitResult {
    leader: bool,
}

impl WaitResult {
    /// Whether this party's arrival was the one that tripped the gate
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.leader
    }
}

impl ReleaseGate {
    /// Create a new gate for exactly `parties` parties
    ///
    /// # Panics
    ///
    /// Panics if `parties` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gatemap::ReleaseGate;
    ///
    /// let gate = ReleaseGate::new(11);
    /// assert_eq!(gate.parties(), 11);
    /// ```
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "a gate needs at least one party");

        Self {
            parties,
            state: Mutex::new(GateState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            release: Condvar::new(),
        }
    }

    /// Number of parties required to trip the gate
    #[inline]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Number of parties currently blocked in [`wait`](ReleaseGate::wait)
    pub fn waiting(&self) -> usize {
        self.state.lock().arrived
    }

    /// Number of completed cycles
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Whether the gate has been broken
    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }

    /// Arrive at the gate and block until all parties have arrived
    ///
    /// The final arrival trips the gate: all blocked parties return
    /// `Ok(WaitResult)` and the gate resets for the next cycle. The tripping
    /// party is the cycle's leader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GateFailure`] if the gate is broken, either before this
    /// party arrives or while it is blocked. All waiters of the failed cycle
    /// observe the same error; none is released normally.
    pub fn wait(&self) -> Result<WaitResult> {
        let mut state = self.state.lock();

        if state.broken {
            return Err(Error::GateFailure);
        }

        state.arrived += 1;

        if state.arrived == self.parties {
            // Last party: trip the gate and start the next cycle.
            state.arrived = 0;
            state.generation += 1;
            self.release.notify_all();
            return Ok(WaitResult { leader: true });
        }

        let generation = state.generation;
        loop {
            self.release.wait(&mut state);

            if state.generation != generation {
                return Ok(WaitResult { leader: false });
            }
            if state.broken {
                return Err(Error::GateFailure);
            }
        }
    }

    /// Break the gate
    ///
    /// Every party currently blocked in [`wait`](ReleaseGate::wait) is woken
    /// with [`Error::GateFailure`], and every later arrival fails immediately.
    /// Breaking an already-broken gate has no further effect.
    pub fn break_gate(&self) {
        let mut state = self.state.lock();
        if !state.broken {
            state.broken = true;
            state.arrived = 0;
            self.release.notify_all();
        }
    }
}
