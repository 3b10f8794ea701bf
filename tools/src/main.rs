use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cellnet_tools::{
    format_capture_pretty, inspect_capture, load_grid_config, run_simulation, SimulationOptions,
};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{CodecLimits, Direction, WireLimits};
use simbench::ScenarioConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cellnet-tools",
    version,
    about = "cellnet inspection and simulation tools"
)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a captured byte stream frame by frame.
    Inspect {
        /// Path to the captured bytes.
        capture: PathBuf,
        /// Which opcode table to resolve messages against.
        #[arg(long, value_enum, default_value_t = DirectionArg::Inbound)]
        direction: DirectionArg,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Only report the first N frames.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run a headless visibility simulation and print a summary.
    Simulate {
        /// Grid configuration JSON; defaults apply to missing fields.
        #[arg(long)]
        grid_config: Option<PathBuf>,
        /// Number of simulated players.
        #[arg(long, default_value_t = 64)]
        players: u32,
        /// Number of visibility passes.
        #[arg(long, default_value_t = 100)]
        ticks: u32,
        /// RNG seed for deterministic results.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Pace passes at this many milliseconds apart.
        #[arg(long)]
        pace_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Inbound,
    Outbound,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Inbound => Self::Inbound,
            DirectionArg::Outbound => Self::Outbound,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Inspect {
            capture,
            direction,
            format,
            limit,
        } => {
            let bytes = fs::read(&capture)
                .with_context(|| format!("read capture {}", capture.display()))?;
            let registry = demo_messages::registry().context("build message registry")?;
            let mut report = inspect_capture(
                &bytes,
                &registry,
                direction.into(),
                &WireLimits::default(),
                &CodecLimits::default(),
            );
            if let Some(limit) = limit {
                report.frames.truncate(limit);
            }
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_capture_pretty(&report)),
            }
        }
        Command::Simulate {
            grid_config,
            players,
            ticks,
            seed,
            pace_ms,
        } => {
            let grid = grid_config
                .as_deref()
                .map(load_grid_config)
                .transpose()?
                .unwrap_or_default();
            let options = SimulationOptions {
                grid,
                scenario: ScenarioConfig {
                    players,
                    seed,
                    ..ScenarioConfig::default()
                },
                ticks,
                pace: pace_ms.map(Duration::from_millis),
            };
            let report = run_simulation(&options)?;
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{json}");
        }
    }
    Ok(())
}
