//! End-to-end verification of the pool lifecycle: conservation of slots,
//! staleness detection, exhaustion, zero-elapsed first ticks, sweep
//! removal, slot reuse, and teardown accounting.

use std::cell::RefCell;
use std::rc::Rc;

use warren_core::{
    EntityPool, Handle, PoolError, PooledEntity, TickStatus, TypeSpec,
};

/// Everything a probe entity sees, in the order it saw it.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Event {
    Created(Handle),
    Awake(Handle, usize),
    Tick(Handle, usize, f32),
    Sleep(Handle),
    Release(Handle),
}

type Journal = Rc<RefCell<Vec<Event>>>;

/// Test entity that journals every lifecycle hook. Its placement is the
/// number of sweeps it survives before reporting done.
struct Probe {
    handle: Handle,
    journal: Journal,
    remaining: u32,
}

impl PooledEntity for Probe {
    type Template = Journal;
    type Placement = u32;

    fn on_create(&mut self, handle: Handle) {
        self.handle = handle;
        self.journal.borrow_mut().push(Event::Created(handle));
    }

    fn on_awake(&mut self, order: usize, survive_ticks: u32) {
        self.remaining = survive_ticks;
        self.journal.borrow_mut().push(Event::Awake(self.handle, order));
    }

    fn on_tick(&mut self, order: usize, elapsed: f32) -> TickStatus {
        self.journal
            .borrow_mut()
            .push(Event::Tick(self.handle, order, elapsed));
        if self.remaining == 0 {
            return TickStatus::Done;
        }
        self.remaining -= 1;
        TickStatus::Continue
    }

    fn on_sleep(&mut self) {
        self.journal.borrow_mut().push(Event::Sleep(self.handle));
    }

    fn on_release(&mut self) {
        self.journal.borrow_mut().push(Event::Release(self.handle));
    }
}

fn probe_pool(category: u8, capacities: &[usize]) -> (EntityPool<Probe>, Journal) {
    let journal: Journal = Rc::new(RefCell::new(Vec::new()));
    let specs = capacities
        .iter()
        .map(|&capacity| TypeSpec {
            template: Rc::clone(&journal),
            capacity,
        })
        .collect();

    let mut pool = EntityPool::new(category, specs);
    pool.pre_generate_all(&mut |template: &Journal| Probe {
        handle: Handle::new(0, 0, 0, 0),
        journal: Rc::clone(template),
        remaining: 0,
    });
    (pool, journal)
}

/// Tick events recorded for one slot, as (order, elapsed) pairs.
fn ticks_for(journal: &Journal, slot: u16) -> Vec<(usize, f32)> {
    journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Tick(handle, order, dt) if handle.slot_index() == slot => {
                Some((*order, *dt))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn slot_conservation_holds_across_spawns_and_sweeps() {
    let (mut pool, _journal) = probe_pool(0, &[3, 5]);

    let check = |pool: &EntityPool<Probe>| {
        assert_eq!(pool.active_count(0) + pool.free_count(0), 3);
        assert_eq!(pool.active_count(1) + pool.free_count(1), 5);
    };
    check(&pool);

    pool.frame_start();
    pool.spawn(0, 2).unwrap();
    pool.spawn(1, 0).unwrap();
    pool.spawn(1, 4).unwrap();
    check(&pool);

    pool.advance(0.1);
    check(&pool);

    pool.frame_start();
    pool.advance(0.1);
    pool.clear();
    check(&pool);
}

#[test]
fn handle_is_valid_until_recycled_then_stale() {
    let (mut pool, _journal) = probe_pool(0, &[2]);
    pool.frame_start();

    let handle = pool.spawn(0, 0).unwrap();
    assert!(pool.lookup(handle).is_ok());

    // The probe reports done on its first sweep; its slot goes back to the
    // free list and the handle now names a recycled entity.
    pool.advance(0.1);
    assert_eq!(pool.lookup(handle).err(), Some(PoolError::Stale { handle }));

    // After exactly one re-acquire the old handle is still stale and the
    // fresh one resolves.
    let fresh = pool.spawn(0, 5).unwrap();
    assert_eq!(fresh.slot_index(), handle.slot_index());
    assert_eq!(pool.lookup(handle).err(), Some(PoolError::Stale { handle }));
    assert!(pool.lookup(fresh).is_ok());
}

#[test]
fn spawning_past_capacity_is_deterministically_exhausted() {
    let (mut pool, _journal) = probe_pool(0, &[4]);
    pool.frame_start();

    for _ in 0..4 {
        assert!(pool.spawn(0, 99).is_ok());
    }
    assert_eq!(
        pool.spawn(0, 99),
        Err(PoolError::Exhausted { entity_type: 0 })
    );
    // Still exhausted on retry; nothing was consumed by the failure.
    assert_eq!(
        pool.spawn(0, 99),
        Err(PoolError::Exhausted { entity_type: 0 })
    );
    assert_eq!(pool.active_count(0), 4);
}

#[test]
fn mid_tick_spawn_gets_zero_elapsed_then_real_time() {
    let (mut pool, journal) = probe_pool(0, &[2]);

    pool.frame_start();
    let handle = pool.spawn(0, 9).unwrap();
    pool.advance(0.5);

    pool.frame_start();
    pool.advance(0.5);

    let ticks = ticks_for(&journal, handle.slot_index());
    assert_eq!(ticks, vec![(0, 0.0), (0, 0.5)]);
}

#[test]
fn sweep_removes_exactly_the_done_entities() {
    let (mut pool, journal) = probe_pool(0, &[8]);
    pool.frame_start();

    // Survive counts: zero means done on the first sweep.
    let lifetimes = [1, 0, 1, 0, 1];
    let handles: Vec<Handle> = lifetimes
        .iter()
        .map(|&ttl| pool.spawn(0, ttl).unwrap())
        .collect();

    let before = pool.total_active();
    journal.borrow_mut().clear();
    pool.advance(0.1);

    assert_eq!(before, 5);
    assert_eq!(pool.total_active(), 3);

    // Every entity present in the sweep was ticked exactly once.
    for handle in &handles {
        assert_eq!(ticks_for(&journal, handle.slot_index()).len(), 1);
    }

    // Exactly the short-lived ones went to sleep.
    let slept: Vec<u16> = journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Sleep(handle) => Some(handle.slot_index()),
            _ => None,
        })
        .collect();
    let mut expected: Vec<u16> = handles
        .iter()
        .zip(lifetimes)
        .filter(|(_, ttl)| *ttl == 0)
        .map(|(handle, _)| handle.slot_index())
        .collect();
    let mut slept_sorted = slept.clone();
    slept_sorted.sort_unstable();
    expected.sort_unstable();
    assert_eq!(slept_sorted, expected);
}

#[test]
fn retired_slot_is_reused_with_bumped_generation() {
    let (mut pool, _journal) = probe_pool(0, &[3]);
    pool.frame_start();

    let h0 = pool.spawn(0, 9).unwrap();
    let h1 = pool.spawn(0, 0).unwrap();
    let h2 = pool.spawn(0, 9).unwrap();
    assert_eq!((h0.slot_index(), h1.slot_index(), h2.slot_index()), (0, 1, 2));

    // The entity at activation-index 1 reports done this sweep.
    pool.advance(0.1);
    assert_eq!(pool.total_active(), 2);
    assert_eq!(pool.lookup(h1).err(), Some(PoolError::Stale { handle: h1 }));

    // Its slot is the next one handed out, one generation later.
    let reused = pool.spawn(0, 9).unwrap();
    assert_eq!(reused.slot_index(), h1.slot_index());
    assert_eq!(reused.generation(), h1.generation().wrapping_add(1));
    assert_ne!(reused, h1);
    assert!(pool.lookup(h0).is_ok());
    assert!(pool.lookup(h2).is_ok());
}

#[test]
fn teardown_releases_every_generated_slot_once() {
    let (mut pool, journal) = probe_pool(0, &[3, 2]);
    pool.frame_start();

    // Leave a mix of active and pooled slots behind.
    pool.spawn(0, 9).unwrap();
    pool.spawn(1, 9).unwrap();

    journal.borrow_mut().clear();
    pool.teardown();

    let released: Vec<Handle> = journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Release(handle) => Some(*handle),
            _ => None,
        })
        .collect();

    assert_eq!(released.len(), 5);
    // One release per generated slot, no slot twice.
    let mut keys: Vec<(u8, u16)> = released
        .iter()
        .map(|handle| (handle.entity_type(), handle.slot_index()))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), 5);
}

#[test]
fn initial_handles_carry_generation_zero() {
    let (_pool, journal) = probe_pool(7, &[2]);

    let created: Vec<Handle> = journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Created(handle) => Some(*handle),
            _ => None,
        })
        .collect();

    assert_eq!(created.len(), 2);
    for handle in created {
        assert_eq!(handle.category(), 7);
        assert_eq!(handle.generation(), 0);
    }
}

#[test]
fn activation_order_is_reported_to_awake() {
    let (mut pool, journal) = probe_pool(0, &[4]);
    pool.frame_start();

    for _ in 0..3 {
        pool.spawn(0, 9).unwrap();
    }

    let orders: Vec<usize> = journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Awake(_, order) => Some(*order),
            _ => None,
        })
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}
