//! Seeded random-walk scenarios.

use cellgrid::{EntityId, WorldPosition};

/// Small LCG; deterministic across platforms.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform value in `[min, max]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        let unit = self.next_u32() as f32 / u32::MAX as f32;
        (max - min).mul_add(unit, min)
    }
}

/// Parameters of a random-walk scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub players: u32,
    pub seed: u64,
    /// Players stay inside `[-extent, extent]` on both axes.
    pub extent: f32,
    /// Largest per-tick speed, in world units.
    pub max_speed: f32,
    /// One in `turn_every` ticks a player picks a new velocity.
    pub turn_every: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            players: 64,
            seed: 1,
            extent: 1_000.0,
            max_speed: 12.0,
            turn_every: 20,
        }
    }
}

#[derive(Debug, Clone)]
struct Walker {
    position: WorldPosition,
    velocity: (f32, f32),
}

/// Players walking in straight lines, turning at random and bouncing off the
/// scenario bounds.
#[derive(Debug, Clone)]
pub struct Scenario {
    config: ScenarioConfig,
    rng: Rng,
    walkers: Vec<Walker>,
}

impl Scenario {
    #[must_use]
    pub fn new(config: ScenarioConfig) -> Self {
        let mut rng = Rng::new(config.seed);
        let walkers = (0..config.players)
            .map(|_| Walker {
                position: WorldPosition::new(
                    rng.range_f32(-config.extent, config.extent),
                    rng.range_f32(-config.extent, config.extent),
                ),
                velocity: random_velocity(&mut rng, config.max_speed),
            })
            .collect();
        Self {
            config,
            rng,
            walkers,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Current positions; entity ids start at 1.
    pub fn positions(&self) -> impl Iterator<Item = (EntityId, WorldPosition)> + '_ {
        self.walkers
            .iter()
            .zip(1u32..)
            .map(|(walker, id)| (EntityId(id), walker.position))
    }

    /// Advances every player by one tick.
    pub fn step(&mut self) {
        let extent = self.config.extent;
        for walker in &mut self.walkers {
            if self.config.turn_every > 0 && self.rng.next_u32() % self.config.turn_every == 0 {
                walker.velocity = random_velocity(&mut self.rng, self.config.max_speed);
            }
            let (x, vx) = bounce(walker.position.x, walker.velocity.0, extent);
            let (y, vy) = bounce(walker.position.y, walker.velocity.1, extent);
            walker.position = WorldPosition::new(x, y);
            walker.velocity = (vx, vy);
        }
    }
}

fn random_velocity(rng: &mut Rng, max_speed: f32) -> (f32, f32) {
    (
        rng.range_f32(-max_speed, max_speed),
        rng.range_f32(-max_speed, max_speed),
    )
}

fn bounce(position: f32, velocity: f32, extent: f32) -> (f32, f32) {
    let next = position + velocity;
    if next.abs() > extent {
        (next.clamp(-extent, extent), -velocity)
    } else {
        (next, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_walk() {
        let mut a = Scenario::new(ScenarioConfig::default());
        let mut b = Scenario::new(ScenarioConfig::default());
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert!(a.positions().eq(b.positions()));
    }

    #[test]
    fn players_stay_in_bounds() {
        let config = ScenarioConfig {
            players: 16,
            extent: 50.0,
            max_speed: 20.0,
            ..ScenarioConfig::default()
        };
        let mut scenario = Scenario::new(config);
        for _ in 0..200 {
            scenario.step();
            assert!(scenario
                .positions()
                .all(|(_, p)| p.x.abs() <= 50.0 && p.y.abs() <= 50.0));
        }
    }

    #[test]
    fn range_stays_within_bounds() {
        let mut rng = Rng::new(9);
        for _ in 0..1_000 {
            let value = rng.range_f32(-2.0, 3.0);
            assert!((-2.0..=3.0).contains(&value));
        }
    }
}
