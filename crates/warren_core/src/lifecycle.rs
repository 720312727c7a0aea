//! # Entity Lifecycle Contract
//!
//! The capability set a pooled type must implement. The pool drives these
//! hooks; entity types implement them. Behavior is dispatched through the
//! trait rather than through any inheritance-style hierarchy, so the
//! orchestrator stays generic over "anything poolable".

use crate::handle::Handle;

/// Outcome of one `on_tick` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// The entity stays active and will be ticked again next sweep.
    Continue,
    /// The entity is finished; the sweep puts it to sleep and returns its
    /// slot to the free list.
    Done,
}

/// Capability set for a poolable entity type.
///
/// Hook order over an entity's life:
/// 1. `on_create` — once, when the slot is pre-generated
/// 2. `on_awake` — every activation (spawn)
/// 3. `on_tick` — every sweep while active
/// 4. `on_sleep` — every deactivation
/// 5. `on_release` — once, at pool teardown
pub trait PooledEntity: Sized {
    /// Opaque per-type data the factory instantiates from (the prefab
    /// analog). The pool never inspects it.
    type Template;

    /// Data handed to a freshly-awoken entity (spawn position, payload).
    /// The pool passes it straight through to `on_awake`.
    type Placement;

    /// Called exactly once when the instance is generated, with the
    /// slot's initial handle. Entities that want to know their own identity
    /// store it here.
    fn on_create(&mut self, handle: Handle) {
        let _ = handle;
    }

    /// Called on every activation. `order` is the activation-order index in
    /// the active registry; later activations get higher indices, which
    /// consumers may use as a draw-order priority.
    fn on_awake(&mut self, order: usize, placement: Self::Placement);

    /// Called once per sweep while active. `elapsed` is the tick's real
    /// elapsed time, or zero on the entity's first sweep after a mid-tick
    /// spawn. Returning [`TickStatus::Done`] deactivates the entity.
    ///
    /// Note that `order` is the entity's current registry index; it shifts
    /// when earlier entries are swap-removed.
    fn on_tick(&mut self, order: usize, elapsed: f32) -> TickStatus;

    /// Called when the entity is deactivated and its slot returns to the
    /// free list.
    fn on_sleep(&mut self) {}

    /// Called exactly once at pool teardown, whether the entity was active
    /// or pooled at the time. The instance is dropped afterwards.
    fn on_release(&mut self) {}
}

/// Constructs concrete instances from templates.
///
/// This is the seam to external asset/instantiation plumbing: the pool
/// treats instantiation as an opaque call and never constructs entities
/// itself.
pub trait EntityFactory<T: PooledEntity> {
    /// Builds one instance from the given template.
    fn instantiate(&mut self, template: &T::Template) -> T;
}

impl<T, F> EntityFactory<T> for F
where
    T: PooledEntity,
    F: FnMut(&T::Template) -> T,
{
    #[inline]
    fn instantiate(&mut self, template: &T::Template) -> T {
        self(template)
    }
}
