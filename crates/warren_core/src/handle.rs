//! # Entity Handles
//!
//! Handles are the only reference external code ever holds to a pooled
//! entity. Each handle is a single packed integer encoding:
//! - Which pool owns the slot (`category`)
//! - Which declared entity type the slot belongs to (`entity_type`)
//! - The slot's position in that type's fixed array (`slot_index`)
//! - A reuse counter for detecting stale references (`generation`)

use bytemuck::{Pod, Zeroable};

/// Identifies one pool instance among coexisting pools.
pub type Category = u8;

/// Index into a pool's declared entity types.
pub type TypeIndex = u8;

/// Position within one type's fixed slot array.
pub type SlotIndex = u16;

/// Per-slot reuse counter. Incremented once per reuse, at acquire time.
pub type Generation = u32;

const TYPE_SHIFT: u64 = 16;
const CATEGORY_SHIFT: u64 = 24;
const GENERATION_SHIFT: u64 = 32;

/// Packed reference to a pooled entity.
///
/// The word is split into four fields:
/// - Bits 0..16: Slot index within the type's fixed array
/// - Bits 16..24: Entity type index
/// - Bits 24..32: Pool category
/// - Bits 32..64: Generation counter for detecting stale references
///
/// `(category, entity_type, slot_index)` addresses one storage slot for the
/// pool's entire lifetime; `generation` distinguishes successive occupants
/// of that slot. Equality compares the whole word, so a handle taken before
/// a slot was recycled never compares equal to one taken after.
///
/// # Generation Wraparound
///
/// The generation counter wraps after 2^32 reuses of a single slot. A
/// handle held across a full wrap cycle would falsely validate; this is an
/// accepted limitation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// Packs the four fields into a handle.
    #[inline]
    #[must_use]
    pub const fn new(
        category: Category,
        entity_type: TypeIndex,
        slot_index: SlotIndex,
        generation: Generation,
    ) -> Self {
        Self(
            ((generation as u64) << GENERATION_SHIFT)
                | ((category as u64) << CATEGORY_SHIFT)
                | ((entity_type as u64) << TYPE_SHIFT)
                | (slot_index as u64),
        )
    }

    /// Returns the category of the pool that issued this handle.
    #[inline]
    #[must_use]
    pub const fn category(self) -> Category {
        (self.0 >> CATEGORY_SHIFT) as Category
    }

    /// Returns the entity type index encoded in this handle.
    #[inline]
    #[must_use]
    pub const fn entity_type(self) -> TypeIndex {
        (self.0 >> TYPE_SHIFT) as TypeIndex
    }

    /// Returns the slot index encoded in this handle.
    #[inline]
    #[must_use]
    pub const fn slot_index(self) -> SlotIndex {
        self.0 as SlotIndex
    }

    /// Returns the generation recorded when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> Generation {
        (self.0 >> GENERATION_SHIFT) as Generation
    }

    /// Checks this handle against a slot's live generation counter.
    ///
    /// A handle is stale, and must be rejected, whenever the slot's live
    /// generation differs from the one recorded here.
    #[inline]
    #[must_use]
    pub const fn matches_generation(self, live: Generation) -> bool {
        self.generation() == live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_field_roundtrip() {
        let handle = Handle::new(3, 7, 1234, 99);
        assert_eq!(handle.category(), 3);
        assert_eq!(handle.entity_type(), 7);
        assert_eq!(handle.slot_index(), 1234);
        assert_eq!(handle.generation(), 99);
    }

    #[test]
    fn test_handle_field_extremes() {
        let handle = Handle::new(u8::MAX, u8::MAX, u16::MAX, u32::MAX);
        assert_eq!(handle.category(), u8::MAX);
        assert_eq!(handle.entity_type(), u8::MAX);
        assert_eq!(handle.slot_index(), u16::MAX);
        assert_eq!(handle.generation(), u32::MAX);

        let zero = Handle::new(0, 0, 0, 0);
        assert_eq!(zero.slot_index(), 0);
        assert_eq!(zero.generation(), 0);
    }

    #[test]
    fn test_fields_do_not_bleed() {
        // Saturating one field must leave its neighbors untouched.
        let handle = Handle::new(0, u8::MAX, 0, 0);
        assert_eq!(handle.category(), 0);
        assert_eq!(handle.slot_index(), 0);
        assert_eq!(handle.generation(), 0);
    }

    #[test]
    fn test_generation_distinguishes_occupants() {
        let first = Handle::new(1, 2, 40, 1);
        let second = Handle::new(1, 2, 40, 2);
        assert_ne!(first, second);
        assert!(first.matches_generation(1));
        assert!(!first.matches_generation(2));
    }
}
