//! # Simulation Configuration
//!
//! All run parameters live in one TOML file, loaded once at startup.
//! Everything has a default, so a partial file (or none at all) works.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use warren_core::{MAX_SLOTS_PER_TYPE, MAX_TYPES};

use crate::mote::{MoteKind, MoteTemplate, Vec2};

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum SimError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but its values are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// One declared mote type and its pool capacity.
#[derive(Clone, Debug, Deserialize)]
pub struct MoteSpec {
    /// Strike reaction of this type.
    pub kind: MoteKind,
    /// Slots to pre-allocate. Zero declares the type but leaves it inert.
    pub capacity: usize,
    /// Seconds of natural lifetime per activation.
    pub lifetime: f32,
    /// Drift per second, as `[x, y]`.
    #[serde(default)]
    pub velocity: [f32; 2],
}

impl MoteSpec {
    /// The template handed to the factory for this type.
    #[must_use]
    pub fn template(&self) -> MoteTemplate {
        MoteTemplate {
            kind: self.kind,
            lifetime: self.lifetime,
            velocity: Vec2::new(self.velocity[0], self.velocity[1]),
        }
    }
}

/// Full run configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pool category for this run. Only matters when several pools
    /// coexist; handles from one are rejected by the others.
    pub category: u8,
    /// Seed for every random decision in the run; equal seeds give equal
    /// runs.
    pub seed: u64,
    /// Fixed tick rate in Hz.
    pub tick_hz: u32,
    /// Number of ticks to simulate.
    pub run_ticks: u64,
    /// Seconds between spawn attempts.
    pub spawn_interval: f32,
    /// Seconds between simulated input strikes.
    pub strike_interval: f32,
    /// Width of the spawn field.
    pub field_width: f32,
    /// Height of the spawn field.
    pub field_height: f32,
    /// Declared mote types.
    pub motes: Vec<MoteSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            category: 0,
            seed: 0x5EED,
            tick_hz: 60,
            run_ticks: 3_600,
            spawn_interval: 0.25,
            strike_interval: 0.4,
            field_width: 1920.0,
            field_height: 1080.0,
            motes: vec![
                MoteSpec {
                    kind: MoteKind::Burst,
                    capacity: 48,
                    lifetime: 6.0,
                    velocity: [0.0, 0.0],
                },
                MoteSpec {
                    kind: MoteKind::Drifter,
                    capacity: 48,
                    lifetime: 9.0,
                    velocity: [-40.0, 0.0],
                },
            ],
        }
    }
}

impl SimConfig {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// [`SimError::Parse`] on malformed TOML, [`SimError::InvalidConfig`]
    /// on unusable values.
    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read, plus everything
    /// [`Self::from_toml_str`] can raise.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the parsed values against the engine's hard limits.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] naming the offending value.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_hz == 0 {
            return Err(SimError::InvalidConfig("tick_hz must be positive".into()));
        }
        if self.spawn_interval <= 0.0 {
            return Err(SimError::InvalidConfig(
                "spawn_interval must be positive".into(),
            ));
        }
        if self.strike_interval <= 0.0 {
            return Err(SimError::InvalidConfig(
                "strike_interval must be positive".into(),
            ));
        }
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(SimError::InvalidConfig(
                "field dimensions must be positive".into(),
            ));
        }
        if self.motes.is_empty() {
            return Err(SimError::InvalidConfig(
                "at least one mote type must be declared".into(),
            ));
        }
        if self.motes.len() > MAX_TYPES {
            return Err(SimError::InvalidConfig(format!(
                "{} mote types exceed the pool's limit of {MAX_TYPES}",
                self.motes.len()
            )));
        }
        for (index, mote) in self.motes.iter().enumerate() {
            if mote.lifetime <= 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "mote type {index} must have a positive lifetime"
                )));
            }
            if mote.capacity > MAX_SLOTS_PER_TYPE {
                return Err(SimError::InvalidConfig(format!(
                    "mote type {index} capacity {} exceeds the pool's limit of {MAX_SLOTS_PER_TYPE}",
                    mote.capacity
                )));
            }
        }
        Ok(())
    }
}
