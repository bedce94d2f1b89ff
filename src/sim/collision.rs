//! Collision tests between projectiles and their targets
//!
//! Only the projectile's anchor point (its top-left corner) is tested against
//! the target's box, bounds inclusive on both ends. A projectile whose anchor
//! is still outside the box does not hit even if its body overlaps.

use glam::IVec2;

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub origin: IVec2,
    pub size: IVec2,
}

impl Hitbox {
    pub fn new(origin: IVec2, size: IVec2) -> Self {
        Self { origin, size }
    }

    /// True if `point` lies in `[x, x + w] × [y, y + h]`
    pub fn contains(&self, point: IVec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }
}

/// Does a projectile anchored at `anchor` hit a target at `target` of `size`?
#[inline]
pub fn anchor_hits(anchor: IVec2, target: IVec2, size: IVec2) -> bool {
    Hitbox::new(target, size).contains(anchor)
}
