//! # WARREN Core Engine
//!
//! Fixed-capacity pooling for game entities that are activated and
//! deactivated every frame:
//! - All instances are built once, up front; gameplay only toggles
//!   membership
//! - External code holds bit-packed, generation-versioned handles and can
//!   detect stale ones cheaply
//! - One dense registry sweeps every active entity per tick, with
//!   allocation-free swap removal
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the frame path** - spawn, advance, lookup
//!    and release work entirely inside pre-reserved storage
//! 2. **Handles, not references** - staleness is detected, never
//!    dereferenced
//! 3. **Single-threaded by design** - one logical thread drives the pool
//!    per tick; there is nothing to lock
//!
//! ## Example
//!
//! ```rust,ignore
//! use warren_core::{EntityPool, TypeSpec};
//!
//! let mut pool = EntityPool::new(0, vec![TypeSpec { template, capacity: 64 }]);
//! pool.pre_generate_all(&mut factory);
//!
//! // Per tick:
//! pool.frame_start();
//! let handle = pool.spawn(0, placement)?;
//! pool.advance(elapsed);
//! ```

pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod pool;
pub mod registry;
pub mod slots;

pub use error::{PoolError, PoolResult};
pub use handle::{Category, Generation, Handle, SlotIndex, TypeIndex};
pub use lifecycle::{EntityFactory, PooledEntity, TickStatus};
pub use pool::{EntityPool, TypeSpec, MAX_TYPES};
pub use registry::ActiveRegistry;
pub use slots::{SlotArena, MAX_SLOTS_PER_TYPE};
