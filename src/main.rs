//! Demo binary: ten workers released together by the gate, each inserting one
//! randomly-keyed, timestamped entry into the shared map.
//!
//! Nothing is printed on success; diagnostics go through the logger
//! (`RUST_LOG=debug` to see the run summary and any gate failures).

use gatemap::fanout::{self, FanoutConfig};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let report = fanout::run(&FanoutConfig::default())?;

    info!(
        "{} workers, {} entries in the map ({} key collisions, {} gate failures)",
        report.workers,
        report.map.len(),
        report.key_collisions(),
        report.gate_failures
    );

    Ok(())
}
