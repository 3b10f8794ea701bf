use anyhow::Result;
use serde::Serialize;

/// Aggregate results of one simbench run, written as `summary.json`.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub players: u32,
    pub ticks: u32,
    pub seed: u64,
    pub compression: String,
    pub moved_total: u64,
    pub introductions_total: u64,
    pub discards_total: u64,
    pub fanout_total: u64,
    pub loaded_cells_final: usize,
    pub packets_total: u64,
    pub packet_bytes_total: u64,
    pub avg_packet_bytes: u64,
    pub avg_tick_us: u64,
    pub p95_tick_us: u64,
    pub avg_codec_us: u64,
    pub p95_codec_us: u64,
    #[serde(skip)]
    pub tick_us: Vec<u64>,
    #[serde(skip)]
    pub codec_us: Vec<u64>,
}

impl Summary {
    #[must_use]
    pub fn new(players: u32, ticks: u32, seed: u64, compression: impl Into<String>) -> Self {
        Self {
            players,
            ticks,
            seed,
            compression: compression.into(),
            ..Self::default()
        }
    }

    pub fn finalize(&mut self) {
        if self.packets_total > 0 {
            self.avg_packet_bytes = self.packet_bytes_total / self.packets_total;
        }
        (self.avg_tick_us, self.p95_tick_us) = avg_and_p95(&mut self.tick_us);
        (self.avg_codec_us, self.p95_codec_us) = avg_and_p95(&mut self.codec_us);
    }

    pub fn assert_budgets(&self, max_p95_tick_us: Option<u64>, max_avg_packet_bytes: Option<u64>) -> Result<()> {
        if let Some(max) = max_p95_tick_us {
            if self.p95_tick_us > max {
                anyhow::bail!("p95 tick time {}us exceeds budget {}us", self.p95_tick_us, max);
            }
        }
        if let Some(max) = max_avg_packet_bytes {
            if self.avg_packet_bytes > max {
                anyhow::bail!(
                    "avg packet bytes {} exceeds budget {}",
                    self.avg_packet_bytes,
                    max
                );
            }
        }
        Ok(())
    }
}

fn avg_and_p95(values: &mut [u64]) -> (u64, u64) {
    if values.is_empty() {
        return (0, 0);
    }
    let total: u64 = values.iter().sum();
    (total / values.len() as u64, p95(values))
}

/// 95th percentile (nearest rank). Sorts `values` in place; 0 when empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn p95(values: &mut [u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let idx = ((values.len() as f64) * 0.95).ceil() as usize;
    let idx = idx.saturating_sub(1).min(values.len() - 1);
    values[idx]
}
