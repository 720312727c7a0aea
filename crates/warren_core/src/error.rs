//! # Pool Error Types
//!
//! All errors are local, recoverable conditions reported as values. Nothing
//! in this crate unwinds on the frame path.

use thiserror::Error;

use crate::handle::{Category, Handle, TypeIndex};

/// Errors that can occur while operating a pool.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// No free slot remains for the requested entity type. The spawn simply
    /// failed; the caller decides whether to skip or retry on a later tick.
    #[error("no free slot for entity type {entity_type}")]
    Exhausted {
        /// The type whose free list was empty.
        entity_type: TypeIndex,
    },

    /// The handle refers to a slot that has since been recycled (or is
    /// currently sitting in the free list). The entity it named is already
    /// gone; this is not a condition requiring escalation.
    #[error("stale handle {handle:?}: slot has been recycled")]
    Stale {
        /// The rejected handle.
        handle: Handle,
    },

    /// The handle was issued by a different pool instance.
    #[error("handle {handle:?} does not belong to pool category {expected}")]
    WrongCategory {
        /// The rejected handle.
        handle: Handle,
        /// The category of the pool the handle was presented to.
        expected: Category,
    },

    /// The type index lies outside the pool's declared range.
    #[error("entity type {entity_type} is not declared in this pool")]
    UndeclaredType {
        /// The out-of-range type index.
        entity_type: TypeIndex,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
