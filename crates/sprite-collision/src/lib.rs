//! Umbrella crate for the `sprite-collision` workspace.
//!
//! Re-exports the outline pipeline, the collision tester and the look
//! registry, and ties the latter two together for look-level queries.

pub use sc_collide::*;
pub use sc_core::*;
pub use sc_look::*;
pub use sc_outline::*;

/// Where and how a look is currently drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookPlacement {
    pub look: LookId,
    pub transform: Transform2f,
    pub visible: bool,
}

impl LookPlacement {
    pub fn at(look: LookId, x: f32, y: f32) -> Self {
        Self {
            look,
            transform: Transform2f::translation(x, y),
            visible: true,
        }
    }

    /// `None` until the registry has an outline for the look.
    pub fn place(&self, registry: &CollisionRegistry) -> Option<PlacedOutline> {
        registry
            .outline(self.look)
            .map(|o| PlacedOutline::new(o, &self.transform, self.visible))
    }
}

/// `1.0` when both looks have outlines and they collide, else `0.0`.
pub fn check_looks(registry: &CollisionRegistry, a: &LookPlacement, b: &LookPlacement) -> f64 {
    match (a.place(registry), b.place(registry)) {
        (Some(pa), Some(pb)) => check_collision_between_looks(&pa, &pb),
        _ => 0.0,
    }
}
