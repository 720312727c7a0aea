//! # Pool Orchestrator
//!
//! Ties the per-type slot arenas and the active registry together into the
//! surface the frame driver sees: initialize, pre-generate, frame-start,
//! spawn, advance, lookup, clear, teardown.
//!
//! The orchestrator assumes single-owner, single-thread access for its
//! whole lifetime. Every operation runs to completion without yielding and
//! is bounded by pool size.

use crate::error::{PoolError, PoolResult};
use crate::handle::{Category, Handle, SlotIndex, TypeIndex};
use crate::lifecycle::{EntityFactory, PooledEntity, TickStatus};
use crate::registry::ActiveRegistry;
use crate::slots::SlotArena;

/// Hard ceiling on declared types, set by the handle's type-index width.
pub const MAX_TYPES: usize = (TypeIndex::MAX as usize) + 1;

/// Declaration of one entity type at pool initialization.
pub struct TypeSpec<P> {
    /// Opaque template the factory instantiates from.
    pub template: P,
    /// Number of slots to pre-allocate for this type. Zero is legal; the
    /// type is declared but inert.
    pub capacity: usize,
}

/// Fixed-capacity pool of reusable, typed entities.
///
/// All storage is reserved at construction and filled in by
/// pre-generation; from then on the pool only toggles membership. External
/// code holds [`Handle`]s, never the instances themselves.
///
/// # Categories
///
/// Each pool instance is constructed with a category value carried in every
/// handle it issues, so lookups can reject handles belonging to a different
/// coexisting pool. Keeping category values unique across pools is the
/// caller's contract.
///
/// # Thread Safety
///
/// Not thread-safe, by design: one logical thread drives the pool per tick.
pub struct EntityPool<T: PooledEntity> {
    category: Category,
    templates: Vec<T::Template>,
    arenas: Vec<SlotArena<T>>,
    registry: ActiveRegistry,
}

impl<T: PooledEntity> EntityPool<T> {
    /// Creates a pool owning one slot arena per declared type and an active
    /// registry sized to the sum of capacities.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_TYPES`] types are declared or any capacity
    /// exceeds the handle's slot index range. These are construction-time
    /// contract violations, not runtime conditions.
    #[must_use]
    pub fn new(category: Category, specs: Vec<TypeSpec<T::Template>>) -> Self {
        assert!(
            specs.len() <= MAX_TYPES,
            "{} entity types exceed the handle's type index range",
            specs.len()
        );

        let mut templates = Vec::with_capacity(specs.len());
        let mut arenas = Vec::with_capacity(specs.len());
        let mut total = 0usize;
        for spec in specs {
            total += spec.capacity;
            arenas.push(SlotArena::new(spec.capacity));
            templates.push(spec.template);
        }

        Self {
            category,
            templates,
            arenas,
            registry: ActiveRegistry::new(total),
        }
    }

    /// Returns this pool's category.
    #[inline]
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the number of declared entity types.
    #[inline]
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.arenas.len()
    }

    /// Pre-generates every declared type's instances.
    ///
    /// Intended to run once, off the hot path, since instantiation cost
    /// dominates. Returns the total number of instances built.
    pub fn pre_generate_all<F>(&mut self, factory: &mut F) -> usize
    where
        F: EntityFactory<T>,
    {
        let mut built = 0;
        for entity_type in 0..self.arenas.len() {
            built += self.generate_type(entity_type, factory);
        }
        built
    }

    /// Pre-generates one type's instances, incrementally and idempotently.
    ///
    /// Returns the number of instances built by this call.
    ///
    /// # Errors
    ///
    /// [`PoolError::UndeclaredType`] if the type index is out of range.
    pub fn pre_generate<F>(&mut self, entity_type: TypeIndex, factory: &mut F) -> PoolResult<usize>
    where
        F: EntityFactory<T>,
    {
        if usize::from(entity_type) >= self.arenas.len() {
            return Err(PoolError::UndeclaredType { entity_type });
        }
        Ok(self.generate_type(usize::from(entity_type), factory))
    }

    fn generate_type<F>(&mut self, entity_type: usize, factory: &mut F) -> usize
    where
        F: EntityFactory<T>,
    {
        let category = self.category;
        let template = &self.templates[entity_type];
        let built = self.arenas[entity_type].pre_generate(|slot_index| {
            let mut instance = factory.instantiate(template);
            instance.on_create(Handle::new(category, entity_type as TypeIndex, slot_index, 0));
            instance
        });
        if built > 0 {
            tracing::debug!(entity_type, built, "pre-generated pool slots");
        }
        built
    }

    /// Marks the tick boundary.
    ///
    /// Entities spawned between this call and the next [`Self::advance`]
    /// receive zero elapsed time on their first tick.
    #[inline]
    pub fn frame_start(&mut self) {
        self.registry.frame_start();
    }

    /// Activates one pooled entity of the given type.
    ///
    /// Acquires a slot, attaches it to the active registry, and wakes the
    /// instance with its activation-order index and the placement data.
    /// Returns the handle external code may hold onto.
    ///
    /// Must not be called from inside a sweep callback; the exclusive
    /// borrow `advance` holds already forbids it.
    ///
    /// # Errors
    ///
    /// - [`PoolError::UndeclaredType`] if the type index is out of range.
    /// - [`PoolError::Exhausted`] if no free slot remains; the caller
    ///   decides whether to drop the request or retry on a later tick.
    pub fn spawn(&mut self, entity_type: TypeIndex, placement: T::Placement) -> PoolResult<Handle> {
        let Some(arena) = self.arenas.get_mut(usize::from(entity_type)) else {
            return Err(PoolError::UndeclaredType { entity_type });
        };
        let Some((slot_index, generation)) = arena.acquire() else {
            tracing::debug!(entity_type, "spawn rejected: type exhausted");
            return Err(PoolError::Exhausted { entity_type });
        };

        let handle = Handle::new(self.category, entity_type, slot_index, generation);
        let order = self.registry.attach(handle);
        if let Some(instance) = arena.get_mut(slot_index) {
            instance.on_awake(order, placement);
        }
        Ok(handle)
    }

    /// Sweeps every active entity in activation order.
    ///
    /// Each entity's `on_tick` receives its current index and the elapsed
    /// time (zero on the first sweep after a mid-tick spawn). Entities
    /// reporting [`TickStatus::Done`] are put to sleep and their slots
    /// returned to the free list; this is the single path by which a slot
    /// returns to the pooled state during play.
    pub fn advance(&mut self, elapsed: f32) {
        let Self {
            arenas, registry, ..
        } = self;
        registry.advance(elapsed, |handle, order, dt| {
            let arena = &mut arenas[usize::from(handle.entity_type())];
            let slot_index = handle.slot_index();
            let Some(instance) = arena.get_mut(slot_index) else {
                return TickStatus::Done;
            };
            match instance.on_tick(order, dt) {
                TickStatus::Continue => TickStatus::Continue,
                TickStatus::Done => {
                    instance.on_sleep();
                    arena.release(slot_index);
                    TickStatus::Done
                }
            }
        });
    }

    /// Deactivates every active entity in index order, regardless of its
    /// own state.
    ///
    /// Bulk deactivation independent of a timed sweep; every entity gets
    /// its `on_sleep` and its slot back on the free list.
    pub fn clear(&mut self) {
        let Self {
            arenas, registry, ..
        } = self;
        registry.clear(|handle, _order| {
            let arena = &mut arenas[usize::from(handle.entity_type())];
            let slot_index = handle.slot_index();
            if let Some(instance) = arena.get_mut(slot_index) {
                instance.on_sleep();
            }
            arena.release(slot_index);
        });
    }

    /// Resolves a handle to the entity it names.
    ///
    /// # Errors
    ///
    /// - [`PoolError::WrongCategory`] if the handle was issued by a
    ///   different pool. Programmer error: loud in testing, non-fatal here.
    /// - [`PoolError::UndeclaredType`] if the handle's type bits are out of
    ///   range for this pool.
    /// - [`PoolError::Stale`] if the slot has been recycled since the
    ///   handle was issued, or currently sits in the free list. The entity
    ///   is simply gone; treat it accordingly.
    pub fn lookup(&self, handle: Handle) -> PoolResult<&T> {
        let arena = self.check(handle)?;
        arena
            .get(handle.slot_index())
            .ok_or(PoolError::Stale { handle })
    }

    /// Mutable form of [`Self::lookup`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::lookup`].
    pub fn lookup_mut(&mut self, handle: Handle) -> PoolResult<&mut T> {
        self.check(handle)?;
        self.arenas[usize::from(handle.entity_type())]
            .get_mut(handle.slot_index())
            .ok_or(PoolError::Stale { handle })
    }

    fn check(&self, handle: Handle) -> PoolResult<&SlotArena<T>> {
        if handle.category() != self.category {
            tracing::warn!(
                ?handle,
                expected = self.category,
                "handle presented to the wrong pool"
            );
            return Err(PoolError::WrongCategory {
                handle,
                expected: self.category,
            });
        }
        let Some(arena) = self.arenas.get(usize::from(handle.entity_type())) else {
            return Err(PoolError::UndeclaredType {
                entity_type: handle.entity_type(),
            });
        };
        let slot_index = handle.slot_index();
        if !arena.is_active(slot_index)
            || arena.generation(slot_index) != Some(handle.generation())
        {
            return Err(PoolError::Stale { handle });
        }
        Ok(arena)
    }

    /// Returns the number of currently active entities of one type, or
    /// zero for an undeclared type.
    #[must_use]
    pub fn active_count(&self, entity_type: TypeIndex) -> usize {
        self.arenas
            .get(usize::from(entity_type))
            .map_or(0, SlotArena::active_count)
    }

    /// Returns the number of free slots for one type, or zero for an
    /// undeclared type.
    #[must_use]
    pub fn free_count(&self, entity_type: TypeIndex) -> usize {
        self.arenas
            .get(usize::from(entity_type))
            .map_or(0, SlotArena::free_count)
    }

    /// Returns one type's declared capacity, or zero for an undeclared
    /// type.
    #[must_use]
    pub fn capacity(&self, entity_type: TypeIndex) -> usize {
        self.arenas
            .get(usize::from(entity_type))
            .map_or(0, SlotArena::capacity)
    }

    /// Returns the total number of active entities across all types.
    #[inline]
    #[must_use]
    pub fn total_active(&self) -> usize {
        self.registry.len()
    }

    /// Tears the pool down, invoking `on_release` exactly once on every
    /// generated instance, active or pooled, then discarding all storage.
    ///
    /// Not reversible; consuming the pool makes that explicit. A pool that
    /// is simply dropped skips the release hooks.
    pub fn teardown(mut self) {
        let mut released = 0usize;
        for arena in &mut self.arenas {
            for (_, instance) in arena.iter_mut() {
                instance.on_release();
                released += 1;
            }
        }
        tracing::debug!(released, "pool torn down");
    }
}
