//! Introspection and simulation tools for cellnet.
//!
//! This crate provides:
//!
//! - Frame-by-frame inspection of captured byte streams
//! - Headless visibility simulations with notification totals
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Reports serialize to JSON and have a pretty form.

mod inspect;
mod simulate;

pub use inspect::{format_capture_pretty, inspect_capture, CaptureReport, FrameReport, PacketReport};
pub use simulate::{load_grid_config, run_simulation, SimulationOptions, SimulationReport};
