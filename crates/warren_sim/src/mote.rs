//! # Motes
//!
//! The demo entity the simulation pools: a small spark that drifts across
//! the field until it expires or an input strike claims it. Two kinds
//! exist, differing only in how they react to a strike.

use bytemuck::{Pod, Zeroable};
use serde::Deserialize;
use warren_core::{Handle, PooledEntity, TickStatus};

/// How fast a struck drifter burns through its remaining lifetime.
const STRUCK_BURN_RATE: f32 = 4.0;

/// 2D position or velocity in field units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Strike reaction of a mote kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoteKind {
    /// Pops on the first sweep after a strike.
    Burst,
    /// Keeps drifting after a strike but burns lifetime several times
    /// faster.
    Drifter,
}

/// Per-kind template the factory instantiates motes from.
#[derive(Clone, Copy, Debug)]
pub struct MoteTemplate {
    /// Which strike reaction this kind has.
    pub kind: MoteKind,
    /// Seconds of natural lifetime after each awakening.
    pub lifetime: f32,
    /// Drift per second.
    pub velocity: Vec2,
}

/// One poolable spark.
///
/// State is fully reset on awake, so a recycled instance carries nothing
/// over from its previous activation except its slot identity.
pub struct Mote {
    handle: Handle,
    kind: MoteKind,
    lifetime: f32,
    velocity: Vec2,
    position: Vec2,
    age: f32,
    layer: usize,
    struck: bool,
}

impl Mote {
    /// Builds a dormant instance from its kind template.
    #[must_use]
    pub fn from_template(template: &MoteTemplate) -> Self {
        Self {
            handle: Handle::new(0, 0, 0, 0),
            kind: template.kind,
            lifetime: template.lifetime,
            velocity: template.velocity,
            position: Vec2::default(),
            age: 0.0,
            layer: 0,
            struck: false,
        }
    }

    /// The handle assigned at creation; names this instance's slot.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.handle
    }

    /// This mote's strike reaction.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> MoteKind {
        self.kind
    }

    /// Current field position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Draw-order layer, assigned from the activation-order index at
    /// awakening; later spawns layer in front.
    #[inline]
    #[must_use]
    pub const fn layer(&self) -> usize {
        self.layer
    }

    /// Whether a strike has landed since the last awakening.
    #[inline]
    #[must_use]
    pub const fn is_struck(&self) -> bool {
        self.struck
    }

    /// Lands an input strike on this mote. What happens next depends on
    /// its kind.
    pub fn strike(&mut self) {
        self.struck = true;
    }
}

impl PooledEntity for Mote {
    type Template = MoteTemplate;
    type Placement = Vec2;

    fn on_create(&mut self, handle: Handle) {
        self.handle = handle;
        tracing::trace!(?handle, "mote created");
    }

    fn on_awake(&mut self, order: usize, placement: Vec2) {
        self.position = placement;
        self.age = 0.0;
        self.struck = false;
        self.layer = order;
        tracing::trace!(handle = ?self.handle, order, "mote awake");
    }

    fn on_tick(&mut self, _order: usize, elapsed: f32) -> TickStatus {
        if self.struck && self.kind == MoteKind::Burst {
            return TickStatus::Done;
        }

        let burn = if self.struck { STRUCK_BURN_RATE } else { 1.0 };
        self.age += elapsed * burn;
        self.position.x += self.velocity.x * elapsed;
        self.position.y += self.velocity.y * elapsed;

        if self.age >= self.lifetime {
            TickStatus::Done
        } else {
            TickStatus::Continue
        }
    }

    fn on_sleep(&mut self) {
        self.struck = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(kind: MoteKind) -> MoteTemplate {
        MoteTemplate {
            kind,
            lifetime: 2.0,
            velocity: Vec2::new(10.0, 0.0),
        }
    }

    #[test]
    fn test_awake_resets_state() {
        let mut mote = Mote::from_template(&template(MoteKind::Burst));
        mote.strike();
        mote.on_awake(5, Vec2::new(3.0, 4.0));

        assert_eq!(mote.position(), Vec2::new(3.0, 4.0));
        assert_eq!(mote.layer(), 5);
        assert!(!mote.is_struck());
    }

    #[test]
    fn test_drifts_and_expires_naturally() {
        let mut mote = Mote::from_template(&template(MoteKind::Drifter));
        mote.on_awake(0, Vec2::default());

        assert_eq!(mote.on_tick(0, 1.0), TickStatus::Continue);
        assert_eq!(mote.position(), Vec2::new(10.0, 0.0));
        // Second second of a two-second lifetime is the last.
        assert_eq!(mote.on_tick(0, 1.0), TickStatus::Done);
    }

    #[test]
    fn test_burst_pops_on_sweep_after_strike() {
        let mut mote = Mote::from_template(&template(MoteKind::Burst));
        mote.on_awake(0, Vec2::default());

        assert_eq!(mote.on_tick(0, 0.1), TickStatus::Continue);
        mote.strike();
        assert_eq!(mote.on_tick(0, 0.1), TickStatus::Done);
    }

    #[test]
    fn test_struck_drifter_burns_out_faster() {
        let mut mote = Mote::from_template(&template(MoteKind::Drifter));
        mote.on_awake(0, Vec2::default());
        mote.strike();

        // 2.0 seconds of lifetime at 4x burn: gone within half a second.
        assert_eq!(mote.on_tick(0, 0.25), TickStatus::Continue);
        assert_eq!(mote.on_tick(0, 0.25), TickStatus::Done);
    }

    #[test]
    fn test_zero_elapsed_tick_is_harmless() {
        let mut mote = Mote::from_template(&template(MoteKind::Burst));
        mote.on_awake(0, Vec2::new(1.0, 1.0));

        assert_eq!(mote.on_tick(0, 0.0), TickStatus::Continue);
        assert_eq!(mote.position(), Vec2::new(1.0, 1.0));
    }
}
