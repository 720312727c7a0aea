//! # Simulation Driver
//!
//! The frame loop the pooling engine is built to serve: one `frame_start`
//! per tick, timed spawns between the boundary and the sweep, simulated
//! input strikes through handle lookups, then `advance`.
//!
//! Fully deterministic for a given configuration: every random decision
//! comes from one seeded stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use warren_core::{EntityFactory, EntityPool, Handle, PoolError, TypeIndex, TypeSpec};

use crate::config::{SimConfig, SimError};
use crate::mote::{Mote, MoteTemplate, Vec2};

/// Stand-in for the asset/instantiation layer; builds motes from their
/// templates and counts what it built.
pub struct MoteFactory {
    built: usize,
}

impl MoteFactory {
    /// Creates an empty factory.
    #[must_use]
    pub const fn new() -> Self {
        Self { built: 0 }
    }

    /// Number of instances built so far.
    #[inline]
    #[must_use]
    pub const fn built(&self) -> usize {
        self.built
    }
}

impl Default for MoteFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityFactory<Mote> for MoteFactory {
    fn instantiate(&mut self, template: &MoteTemplate) -> Mote {
        self.built += 1;
        Mote::from_template(template)
    }
}

/// What a completed run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks simulated.
    pub ticks: u64,
    /// Instances built during pre-generation.
    pub instantiated: usize,
    /// Successful spawns.
    pub spawned: u64,
    /// Spawns rejected because a type was exhausted.
    pub exhausted: u64,
    /// Strikes landed on live motes.
    pub strikes: u64,
    /// Stale handles encountered while aiming strikes.
    pub stale_hits: u64,
    /// Motes retired by sweeps (and the final clear).
    pub retired: u64,
    /// Highest simultaneous active count observed.
    pub peak_active: usize,
}

/// Owns the pool and drives it tick by tick.
pub struct Simulation {
    config: SimConfig,
    pool: EntityPool<Mote>,
    rng: ChaCha8Rng,
    /// Handles the driver is still holding onto; some go stale as sweeps
    /// retire their motes, which is exactly what lookups detect.
    live: Vec<Handle>,
    total_capacity: usize,
    spawn_clock: f32,
    strike_clock: f32,
    stats: RunStats,
}

impl Simulation {
    /// Builds the pool from the configuration and pre-generates every
    /// declared type.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] if the configuration fails validation.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let specs: Vec<TypeSpec<MoteTemplate>> = config
            .motes
            .iter()
            .map(|mote| TypeSpec {
                template: mote.template(),
                capacity: mote.capacity,
            })
            .collect();
        let total_capacity: usize = config.motes.iter().map(|mote| mote.capacity).sum();

        let mut pool = EntityPool::new(config.category, specs);
        let mut factory = MoteFactory::new();
        let instantiated = pool.pre_generate_all(&mut factory);
        tracing::info!(
            instantiated,
            types = pool.type_count(),
            category = config.category,
            "pool pre-generated"
        );

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            rng,
            pool,
            live: Vec::with_capacity(total_capacity),
            total_capacity,
            spawn_clock: 0.0,
            strike_clock: 0.0,
            stats: RunStats {
                instantiated,
                ..RunStats::default()
            },
            config,
        })
    }

    /// Runs the configured number of ticks, then clears and tears the pool
    /// down.
    #[must_use]
    pub fn run(mut self) -> RunStats {
        let dt = 1.0 / self.config.tick_hz as f32;
        for _ in 0..self.config.run_ticks {
            self.tick(dt);
        }
        self.finish()
    }

    fn tick(&mut self, dt: f32) {
        self.pool.frame_start();

        self.spawn_clock += dt;
        while self.spawn_clock >= self.config.spawn_interval {
            self.spawn_clock -= self.config.spawn_interval;
            self.spawn_one();
        }

        self.strike_clock += dt;
        while self.strike_clock >= self.config.strike_interval {
            self.strike_clock -= self.config.strike_interval;
            self.strike_one();
        }

        let before = self.pool.total_active();
        self.pool.advance(dt);
        self.stats.retired += (before - self.pool.total_active()) as u64;
        self.stats.peak_active = self.stats.peak_active.max(before);
        self.stats.ticks += 1;

        // Keep the held-handle list from silting up with stale entries.
        if self.live.len() > 2 * self.total_capacity.max(1) {
            let pool = &self.pool;
            self.live.retain(|&handle| pool.lookup(handle).is_ok());
        }
    }

    fn spawn_one(&mut self) {
        let entity_type = self.rng.gen_range(0..self.pool.type_count()) as TypeIndex;
        let placement = Vec2::new(
            self.rng.gen_range(0.0..self.config.field_width),
            self.rng.gen_range(0.0..self.config.field_height),
        );

        match self.pool.spawn(entity_type, placement) {
            Ok(handle) => {
                self.live.push(handle);
                self.stats.spawned += 1;
            }
            Err(PoolError::Exhausted { entity_type }) => {
                self.stats.exhausted += 1;
                tracing::debug!(entity_type, "spawn skipped: type exhausted");
            }
            Err(error) => tracing::warn!(%error, "unexpected spawn failure"),
        }
    }

    fn strike_one(&mut self) {
        if self.live.is_empty() {
            return;
        }
        let target = self.rng.gen_range(0..self.live.len());
        let handle = self.live[target];

        match self.pool.lookup_mut(handle) {
            Ok(mote) => {
                mote.strike();
                self.stats.strikes += 1;
            }
            Err(PoolError::Stale { .. }) => {
                // The mote this handle named is long gone; drop the handle.
                self.live.swap_remove(target);
                self.stats.stale_hits += 1;
            }
            Err(error) => tracing::warn!(%error, "unexpected lookup failure"),
        }
    }

    fn finish(mut self) -> RunStats {
        self.stats.retired += self.pool.total_active() as u64;
        self.pool.clear();
        self.pool.teardown();

        tracing::info!(
            ticks = self.stats.ticks,
            spawned = self.stats.spawned,
            retired = self.stats.retired,
            exhausted = self.stats.exhausted,
            "run complete"
        );
        self.stats
    }
}
