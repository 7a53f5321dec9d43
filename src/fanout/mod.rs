//! Gated fan-out insert
//!
//! The coordinator/worker glue: a configurable number of worker threads are
//! held at a [`ReleaseGate`], released simultaneously by the coordinator's own
//! arrival, and each writes one randomly-keyed, timestamped entry into a
//! [`SharedMap`].
//!
//! ## Control flow
//!
//! [`run`] builds one gate sized for workers + 1 and one map, hands both to
//! every worker by `Arc`, then arrives at the gate as the final party. No
//! worker's insert can happen before that arrival. The coordinator joins all
//! workers before returning, so the [`FanoutReport`] reflects every outcome
//! and the process never exits with inserts still in flight.
//!
//! ## Gate failures
//!
//! A worker whose gate wait fails logs a diagnostic and then follows the
//! configured [`GateFailurePolicy`]: either insert anyway ([`Proceed`], the
//! default) or skip the insert and report the failure ([`Abort`]).
//!
//! [`Proceed`]: GateFailurePolicy::Proceed
//! [`Abort`]: GateFailurePolicy::Abort
//!
//! ## Example
//!
//! ```rust
//! use gatemap::fanout::{self, FanoutConfig};
//!
//! let report = fanout::run(&FanoutConfig::default()).unwrap();
//!
//! // Ten inserts; fewer entries only if two random keys collided.
//! assert_eq!(report.inserts, 10);
//! assert!((1..=10).contains(&report.map.len()));
//! ```

use crate::gate::ReleaseGate;
use crate::map::SharedMap;
use crate::{Error, Result};
use log::{debug, error, warn};
use std::sync::Arc;
use std::thread;
use std::time::Instant;


/// Worker count used by [`FanoutConfig::default`]
pub const DEFAULT_WORKERS: usize = 10;

/// What a worker does when its gate wait fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateFailurePolicy {
    /// Log the failure and perform the insert anyway
    #[default]
    Proceed,
    /// Log the failure, skip the insert, and report [`Error::GateFailure`]
    Abort,
}

/// Configuration for a fan-out run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutConfig {
    /// Number of worker threads; the gate is sized for one more (the
    /// coordinator)
    pub workers: usize,
    /// Policy applied by a worker whose gate wait fails
    pub on_gate_failure: GateFailurePolicy,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            on_gate_failure: GateFailurePolicy::Proceed,
        }
    }
}

/// Outcome of a fan-out run, available once every worker has been joined
#[derive(Debug)]
pub struct FanoutReport {
    /// The map the workers wrote into
    pub map: Arc<SharedMap<i32, u64>>,
    /// Number of workers launched
    pub workers: usize,
    /// Number of inserts actually performed
    pub inserts: usize,
    /// Number of workers whose gate wait failed
    pub gate_failures: usize,
    /// Monotonic nanoseconds recorded before any worker was spawned; every
    /// map value is strictly greater
    pub pre_spawn_nanos: u64,
}

impl FanoutReport {
    /// Number of inserts that landed on an already-occupied key
    pub fn key_collisions(&self) -> usize {
        self.inserts - self.map.len()
    }
}

/// What a single worker reports back through its join handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WorkerReport {
    gate_failed: bool,
}

/// Run the gated fan-out: spawn the workers, trip the gate, join everyone
///
/// # Errors
///
/// * [`Error::InvalidConfig`] if `config.workers` is zero
/// * [`Error::GateFailure`] if the coordinator's own gate wait fails; workers
///   are still joined first
pub fn run(config: &FanoutConfig) -> Result<FanoutReport> {
    if config.workers == 0 {
        return Err(Error::InvalidConfig);
    }

    let epoch = Instant::now();
    let gate = Arc::new(ReleaseGate::new(config.workers + 1));
    let map = Arc::new(SharedMap::with_capacity(config.workers));
    let pre_spawn_nanos = nanos_since(epoch);

    let handles: Vec<_> = (0..config.workers)
        .map(|worker| {
            let gate = Arc::clone(&gate);
            let map = Arc::clone(&map);
            let policy = config.on_gate_failure;
            thread::spawn(move || worker_run(worker, &gate, &map, epoch, policy))
        })
        .collect();

    // Final arrival: this is what releases the workers.
    let coordinator = gate.wait();

    let mut inserts = 0;
    let mut gate_failures = 0;
    for (worker, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(report)) => {
                inserts += 1;
                if report.gate_failed {
                    gate_failures += 1;
                }
            }
            Ok(Err(_)) => gate_failures += 1,
            Err(_) => error!("worker {worker} panicked"),
        }
    }

    coordinator?;

    debug!(
        "released {} workers: {} inserts, {} gate failures",
        config.workers, inserts, gate_failures
    );

    Ok(FanoutReport {
        map,
        workers: config.workers,
        inserts,
        gate_failures,
        pre_spawn_nanos,
    })
}

/// One worker's whole life: await the gate, then perform a single insert.
fn worker_run(
    worker: usize,
    gate: &ReleaseGate,
    map: &SharedMap<i32, u64>,
    epoch: Instant,
    policy: GateFailurePolicy,
) -> Result<WorkerReport> {
    let mut gate_failed = false;

    if let Err(err) = gate.wait() {
        warn!("worker {worker}: gate wait failed: {err}");
        match policy {
            GateFailurePolicy::Abort => return Err(err),
            GateFailurePolicy::Proceed => gate_failed = true,
        }
    }

    let key = rand::random::<i32>();
    let timestamp = nanos_since(epoch);
    map.insert(key, timestamp);

    Ok(WorkerReport { gate_failed })
}

/// Monotonic nanoseconds elapsed since the run's epoch.
fn nanos_since(epoch: Instant) -> u64 {
    u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
}
