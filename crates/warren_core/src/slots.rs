//! # Slot Arena
//!
//! Fixed-capacity storage for all instances of one entity type, with
//! free-list recycling and per-slot generation counters.
//!
//! The arena never allocates or destroys instances outside of
//! pre-generation and drop. Activation and deactivation only toggle
//! membership: acquire pops the free list, release pushes it.

use crate::handle::{Generation, SlotIndex};

/// Hard ceiling on per-type capacity, set by the handle's slot-index width.
pub const MAX_SLOTS_PER_TYPE: usize = (SlotIndex::MAX as usize) + 1;

/// One pre-allocated instance plus its recycling bookkeeping.
struct Slot<T> {
    instance: T,
    generation: Generation,
    active: bool,
}

/// Fixed-capacity instance storage for one entity type.
///
/// All memory is reserved at construction; `pre_generate` fills it in (all
/// at once or incrementally) and nothing grows afterwards. A capacity of
/// zero is legal: the arena is simply inert and every acquire fails.
///
/// # Invariants
///
/// - `active_count() + free_count() == generated_count()` at all times
/// - a slot's generation is bumped exactly once per reuse, at acquire time
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<SlotIndex>,
    capacity: usize,
}

impl<T> SlotArena<T> {
    /// Creates an arena for up to `capacity` instances.
    ///
    /// Reserves storage but builds no instances; see [`Self::pre_generate`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`MAX_SLOTS_PER_TYPE`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity <= MAX_SLOTS_PER_TYPE,
            "capacity {capacity} exceeds the handle's slot index range"
        );

        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the declared capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many slots have been generated so far.
    #[inline]
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns how many generated slots are currently in the free list.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Returns how many generated slots are currently acquired.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Builds every not-yet-generated slot and pushes it onto the free list.
    ///
    /// Idempotent: slots already generated are skipped, so the call may be
    /// repeated (instantiation cost can be amortized across frames by an
    /// orchestrator that interleaves calls with other work).
    ///
    /// `build` receives the slot index and returns the instance; the
    /// freshly-generated batch is stacked so the lowest new index is
    /// acquired first.
    ///
    /// Returns the number of slots generated by this call.
    pub fn pre_generate<F>(&mut self, mut build: F) -> usize
    where
        F: FnMut(SlotIndex) -> T,
    {
        let start = self.slots.len();
        for index in start..self.capacity {
            let instance = build(index as SlotIndex);
            self.slots.push(Slot {
                instance,
                generation: 0,
                active: false,
            });
        }
        for index in (start..self.capacity).rev() {
            self.free.push(index as SlotIndex);
        }
        self.capacity - start
    }

    /// Pops a slot off the free list, bumping its generation and raising its
    /// active flag.
    ///
    /// Returns the slot index and its new live generation, or `None` when
    /// the free list is empty.
    pub fn acquire(&mut self) -> Option<(SlotIndex, Generation)> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.active = true;
        Some((index, slot.generation))
    }

    /// Pushes a slot back onto the free list.
    ///
    /// The caller must guarantee the slot was previously acquired and not
    /// already released; the orchestrator upholds this by construction
    /// (release happens only on the single deactivation path).
    pub fn release(&mut self, index: SlotIndex) {
        let slot = &mut self.slots[index as usize];
        debug_assert!(slot.active, "release of a slot that is not acquired");
        slot.active = false;
        self.free.push(index);
    }

    /// Returns the live generation of a generated slot.
    #[inline]
    #[must_use]
    pub fn generation(&self, index: SlotIndex) -> Option<Generation> {
        self.slots.get(index as usize).map(|slot| slot.generation)
    }

    /// Returns whether a slot is currently acquired.
    #[inline]
    #[must_use]
    pub fn is_active(&self, index: SlotIndex) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(|slot| slot.active)
    }

    /// Returns a generated slot's instance, acquired or pooled.
    #[inline]
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        self.slots.get(index as usize).map(|slot| &slot.instance)
    }

    /// Returns a generated slot's instance mutably, acquired or pooled.
    #[inline]
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .map(|slot| &mut slot.instance)
    }

    /// Iterates mutably over every generated instance, acquired or pooled.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotIndex, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .map(|(index, slot)| (index as SlotIndex, &mut slot.instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(arena: &mut SlotArena<u32>) -> usize {
        arena.pre_generate(|index| u32::from(index) * 10)
    }

    #[test]
    fn test_pre_generate_fills_to_capacity() {
        let mut arena: SlotArena<u32> = SlotArena::new(4);
        assert_eq!(generated(&mut arena), 4);
        assert_eq!(arena.generated_count(), 4);
        assert_eq!(arena.free_count(), 4);
        assert_eq!(arena.active_count(), 0);
    }

    #[test]
    fn test_pre_generate_is_idempotent() {
        let mut arena: SlotArena<u32> = SlotArena::new(4);
        assert_eq!(generated(&mut arena), 4);
        assert_eq!(generated(&mut arena), 0);
        assert_eq!(arena.generated_count(), 4);
        assert_eq!(arena.free_count(), 4);
    }

    #[test]
    fn test_acquire_order_and_exhaustion() {
        let mut arena: SlotArena<u32> = SlotArena::new(3);
        generated(&mut arena);

        // Lowest generated index comes off the stack first.
        assert_eq!(arena.acquire(), Some((0, 1)));
        assert_eq!(arena.acquire(), Some((1, 1)));
        assert_eq!(arena.acquire(), Some((2, 1)));
        assert_eq!(arena.acquire(), None);
        assert_eq!(arena.active_count(), 3);
    }

    #[test]
    fn test_release_reuses_lifo_with_bumped_generation() {
        let mut arena: SlotArena<u32> = SlotArena::new(3);
        generated(&mut arena);
        for _ in 0..3 {
            arena.acquire();
        }

        arena.release(1);
        assert_eq!(arena.free_count(), 1);
        assert!(!arena.is_active(1));

        // The released slot comes back first, one generation later.
        assert_eq!(arena.acquire(), Some((1, 2)));
        assert!(arena.is_active(1));
    }

    #[test]
    fn test_generation_bumps_only_at_acquire() {
        let mut arena: SlotArena<u32> = SlotArena::new(1);
        generated(&mut arena);

        assert_eq!(arena.generation(0), Some(0));
        arena.acquire();
        assert_eq!(arena.generation(0), Some(1));
        arena.release(0);
        // Release leaves the counter alone; the bump belongs to acquire.
        assert_eq!(arena.generation(0), Some(1));
        arena.acquire();
        assert_eq!(arena.generation(0), Some(2));
    }

    #[test]
    fn test_zero_capacity_is_inert() {
        let mut arena: SlotArena<u32> = SlotArena::new(0);
        assert_eq!(generated(&mut arena), 0);
        assert_eq!(arena.acquire(), None);
        assert_eq!(arena.capacity(), 0);
    }

    #[test]
    fn test_membership_invariant_holds() {
        let mut arena: SlotArena<u32> = SlotArena::new(8);
        generated(&mut arena);

        let (first, _) = arena.acquire().unwrap();
        let (second, _) = arena.acquire().unwrap();
        arena.release(first);
        arena.acquire();
        arena.release(second);

        assert_eq!(
            arena.active_count() + arena.free_count(),
            arena.generated_count()
        );
    }
}
