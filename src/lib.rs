//! # gatemap
//!
//! A small library demonstrating the *gated fan-out insert* pattern: a fixed
//! number of worker threads are held at a rendezvous point, released
//! simultaneously, and each performs one write into a shared concurrent map.
//!
//! ## Components
//!
//! - [`ReleaseGate`]: a cyclic rendezvous barrier that blocks a fixed number of
//!   parties until all have arrived, then releases them together
//! - [`SharedMap`]: a concurrency-safe key-value container supporting insertion
//!   from any number of threads without caller-side locking
//! - [`fanout`]: the coordinator/worker glue tying the two together
//!
//! ## Quick Start
//!
//! ```rust
//! use gatemap::fanout::{self, FanoutConfig};
//!
//! let report = fanout::run(&FanoutConfig::default()).unwrap();
//! assert!(report.map.len() >= 1 && report.map.len() <= report.workers);
//! ```
//!
//! ## Thread Safety
//!
//! Both primitives carry their own internal synchronization; callers never take
//! external locks. The gate and the map are constructed once per run and handed
//! to each worker by shared ownership, not through process-wide statics.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod fanout;
pub mod gate;
pub mod map;

pub use crate::gate::ReleaseGate;
pub use crate::map::SharedMap;

/// Error types for gatemap operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The release gate was broken while a party was arriving or waiting
    GateFailure,
    /// A run configuration was rejected before any thread was started
    InvalidConfig,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::GateFailure => write!(f, "Release gate was broken"),
            Error::InvalidConfig => write!(f, "Invalid fan-out configuration"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for gatemap operations
pub type Result<T> = core::result::Result<T, Error>;
