//! # WARREN Field Simulation
//!
//! Headless driver that exercises the pooling engine the way a game frame
//! loop would: pre-generate once, then tick — spawn motes on a timer,
//! land simulated input strikes through handle lookups, sweep, repeat.
//!
//! Everything is deterministic for a given configuration; equal seeds give
//! equal runs.

pub mod config;
pub mod driver;
pub mod mote;

pub use config::{MoteSpec, SimConfig, SimError};
pub use driver::{MoteFactory, RunStats, Simulation};
pub use mote::{Mote, MoteKind, MoteTemplate, Vec2};
