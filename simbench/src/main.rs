use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use cellgrid::{ChannelId, GridConfig, VisibilityTracker};
use clap::{Parser, ValueEnum};
use codec::{
    encode_packet_to_vec, CodecLimits, Compression, Direction, InboundStream, ProtocolPacket,
    SubChannel, WireLimits,
};
use demo_messages::{Move, MoveMode};
use simbench::{CountingSink, Scenario, ScenarioConfig, Summary};

#[derive(Parser)]
#[command(name = "simbench", version, about = "cellnet simulation benchmark harness")]
struct Cli {
    /// Number of simulated players.
    #[arg(long, default_value_t = 64)]
    players: u32,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 300)]
    ticks: u32,
    /// RNG seed for deterministic results.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Half-width of the square world, in world units.
    #[arg(long, default_value_t = 1_000.0)]
    extent: f32,
    /// Chebyshev view range in cells.
    #[arg(long, default_value_t = 2)]
    view_range: i32,
    /// Compression applied to every movement packet.
    #[arg(long, value_enum, default_value_t = CompressionArg::Disabled)]
    compression: CompressionArg,
    /// Output directory for summary.json.
    #[arg(long, default_value = "target/simbench")]
    out_dir: PathBuf,
    /// Fail if p95 visibility tick time exceeds this value.
    #[arg(long)]
    max_p95_tick_us: Option<u64>,
    /// Fail if average packet size exceeds this value.
    #[arg(long)]
    max_avg_packet_bytes: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionArg {
    Disabled,
    Stored,
    Deflate,
}

impl CompressionArg {
    const fn to_compression(self) -> Compression {
        match self {
            Self::Disabled => Compression::Disabled,
            Self::Stored => Compression::Stored,
            Self::Deflate => Compression::Deflate,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Stored => "stored",
            Self::Deflate => "deflate",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let limits = CodecLimits::default();
    let registry = Arc::new(demo_messages::registry().context("build message registry")?);

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir {}", cli.out_dir.display()))?;

    let config = GridConfig {
        view_range: cli.view_range,
        ..GridConfig::default()
    };
    let mut tracker =
        VisibilityTracker::new(ChannelId(1), config).context("invalid grid configuration")?;
    let mut scenario = Scenario::new(ScenarioConfig {
        players: cli.players,
        seed: cli.seed,
        extent: cli.extent,
        ..ScenarioConfig::default()
    });
    let mut stream = InboundStream::new(
        Arc::clone(&registry),
        Direction::Inbound,
        WireLimits::default(),
        limits.clone(),
    );

    let mut sink = CountingSink::default();
    for (entity, position) in scenario.positions() {
        tracker
            .join(entity, position, &mut sink)
            .with_context(|| format!("join {entity}"))?;
    }

    let mut summary = Summary::new(cli.players, cli.ticks, cli.seed, cli.compression.name());
    let mut sequence = 0u32;

    for _ in 0..cli.ticks {
        scenario.step();
        let positions: Vec<_> = scenario.positions().collect();

        let start = Instant::now();
        let report = tracker.tick(positions.iter().copied(), &mut sink);
        summary.tick_us.push(elapsed_us(start));
        summary.moved_total += report.moved as u64;

        let start = Instant::now();
        for (_, position) in &positions {
            sequence = sequence.wrapping_add(1);
            let packet = ProtocolPacket::sequenced(
                SubChannel::new(1),
                sequence,
                Box::new(Move {
                    mode: MoveMode::Run,
                    x: position.x,
                    y: position.y,
                    z: 0.0,
                    heading: 0.0,
                }),
            )
            .with_compression(cli.compression.to_compression());
            let bytes = encode_packet_to_vec(&packet, &limits).context("encode move packet")?;
            summary.packets_total += 1;
            summary.packet_bytes_total += bytes.len() as u64;
            stream.push(&bytes).context("buffer move packet")?;
        }
        let decoded = stream.drain_packets().context("decode move packets")?;
        summary.codec_us.push(elapsed_us(start));
        if decoded.len() != positions.len() {
            anyhow::bail!(
                "decoded {} packets, expected {}",
                decoded.len(),
                positions.len()
            );
        }
    }

    summary.introductions_total = sink.introductions;
    summary.discards_total = sink.discards;
    summary.fanout_total = sink.fanout;
    summary.loaded_cells_final = tracker.grid().len();
    summary.finalize();
    summary.assert_budgets(cli.max_p95_tick_us, cli.max_avg_packet_bytes)?;
    write_summary_json(&cli.out_dir, &summary)?;

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

fn write_summary_json(out_dir: &Path, summary: &Summary) -> Result<()> {
    let path = out_dir.join("summary.json");
    let contents = serde_json::to_string_pretty(summary).context("serialize summary")?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
