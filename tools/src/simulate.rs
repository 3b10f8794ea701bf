use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cellgrid::{ChannelId, GridConfig, TickSchedule, VisibilityTracker};
use serde::Serialize;
use simbench::{CountingSink, Scenario, ScenarioConfig};
use tracing::{debug, info};

/// Inputs of a headless visibility run.
#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    pub grid: GridConfig,
    pub scenario: ScenarioConfig,
    pub ticks: u32,
    /// Pace passes with this interval instead of running flat out.
    pub pace: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub players: u32,
    pub ticks: u32,
    pub linked: usize,
    pub loaded_cells: usize,
    pub moved: u64,
    pub unchanged: u64,
    pub skipped: u64,
    pub introductions: u64,
    pub discards: u64,
    pub fanout: u64,
}

/// Reads a grid configuration from JSON. Missing fields take their defaults.
pub fn load_grid_config(path: &Path) -> Result<GridConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read grid config {}", path.display()))?;
    let config: GridConfig = serde_json::from_str(&contents).context("parse grid config json")?;
    config
        .validate()
        .map_err(|err| anyhow::anyhow!("grid config validation failed: {err}"))?;
    Ok(config)
}

/// Joins every scenario player, then runs `ticks` visibility passes.
pub fn run_simulation(options: &SimulationOptions) -> Result<SimulationReport> {
    let mut tracker = VisibilityTracker::new(ChannelId(1), options.grid.clone())
        .context("invalid grid configuration")?;
    let mut scenario = Scenario::new(options.scenario.clone());
    let mut sink = CountingSink::default();

    for (entity, position) in scenario.positions() {
        tracker
            .join(entity, position, &mut sink)
            .with_context(|| format!("join {entity}"))?;
    }

    let mut report = SimulationReport {
        players: options.scenario.players,
        ticks: options.ticks,
        linked: 0,
        loaded_cells: 0,
        moved: 0,
        unchanged: 0,
        skipped: 0,
        introductions: 0,
        discards: 0,
        fanout: 0,
    };
    let mut schedule = options.pace.map(TickSchedule::new);

    for tick in 0..options.ticks {
        if let Some(schedule) = schedule.as_mut() {
            wait_until_due(schedule);
        }
        scenario.step();
        let pass = tracker.tick(scenario.positions(), &mut sink);
        report.moved += pass.moved as u64;
        report.unchanged += pass.unchanged as u64;
        report.skipped += pass.skipped as u64;
        debug!(tick, moved = pass.moved, "visibility pass");
    }

    report.linked = tracker.linked_count();
    report.loaded_cells = tracker.grid().len();
    report.introductions = sink.introductions;
    report.discards = sink.discards;
    report.fanout = sink.fanout;
    info!(
        players = report.players,
        ticks = report.ticks,
        loaded_cells = report.loaded_cells,
        "simulation finished"
    );
    Ok(report)
}

fn wait_until_due(schedule: &mut TickSchedule) {
    while !schedule.poll(Instant::now()) {
        thread::sleep(Duration::from_millis(1));
    }
}
