//! Scenario generation and benchmarking for cellnet.
//!
//! This crate provides:
//!
//! - Deterministic random-walk scenarios for the visibility tracker
//! - A counting sink for notification volume
//! - Run summaries with JSON output for the `simbench` binary
//!
//! # Design Principles
//!
//! - **Reproducible** - All scenarios are deterministic given a seed.
//! - **Measurable** - Output format suitable for CI regression tracking.

mod scenario;
mod sink;
mod summary;

pub use scenario::{Rng, Scenario, ScenarioConfig};
pub use sink::CountingSink;
pub use summary::{p95, Summary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = ScenarioConfig::default();
        let _ = CountingSink::default();
        let _ = Rng::new(1);
    }
}
