//! Collision classification and candidate queries.
//!
//! The scene's physics engine is out of scope; the core only needs the set of
//! hittable circles and their classification. [`ColliderQuery`] is the seam a
//! host engine implements, [`ColliderSet`] is the in-core implementation used
//! by the runtime and tests.
//!
//! Collider centers are visual-space positions; radii are logical units so a
//! target is equally "fat" in every logical direction.

pub mod geometry;

use bitflags::bitflags;
use glam::Vec2;

use crate::types::EntityId;

bitflags! {
    /// Coarse physics classification used for target and obstacle masks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct CollisionMask: u16 {
        const PLAYER   = 1 << 0;
        const ENEMY    = 1 << 1;
        const ALLY     = 1 << 2;
        const OBSTACLE = 1 << 3;
        const NEUTRAL  = 1 << 4;
    }
}

bitflags! {
    /// Receiver sub-part a hit-volume is allowed to affect.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct InteractionLayer: u8 {
        const BODY = 1 << 0;
        const FEET = 1 << 1;
    }
}

impl Default for InteractionLayer {
    fn default() -> Self {
        Self::BODY
    }
}

/// A hittable circle owned by some entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Entity the shape belongs to; used for self-hit exclusion and hit history.
    pub owner: EntityId,
    /// Visual-space center.
    pub center: Vec2,
    /// Logical radius.
    pub radius: f32,
    pub mask: CollisionMask,
    pub layer: InteractionLayer,
}

impl Collider {
    pub fn new(owner: EntityId, center: Vec2, radius: f32, mask: CollisionMask) -> Self {
        Self {
            owner,
            center,
            radius,
            mask,
            layer: InteractionLayer::BODY,
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: InteractionLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn is_obstacle(&self, obstacle_mask: CollisionMask) -> bool {
        self.mask.intersects(obstacle_mask)
    }

    /// Mask and interaction-layer filter shared by hit-volumes and instant
    /// queries. History and owner exclusion are checked by the caller.
    pub fn accepts(&self, target_mask: CollisionMask, target_layer: InteractionLayer) -> bool {
        self.mask.intersects(target_mask) && self.layer.intersects(target_layer)
    }
}

/// Source of collision candidates for one tick.
pub trait ColliderQuery {
    fn colliders(&self) -> &[Collider];
}

/// Flat list of colliders.
#[derive(Clone, Debug, Default)]
pub struct ColliderSet {
    colliders: Vec<Collider>,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Removes every collider owned by `owner`. Returns how many were removed.
    pub fn remove_owner(&mut self, owner: EntityId) -> usize {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.owner != owner);
        before - self.colliders.len()
    }

    /// Moves every collider owned by `owner` so it is centered on `center`.
    pub fn set_owner_center(&mut self, owner: EntityId, center: Vec2) {
        for collider in self.colliders.iter_mut().filter(|c| c.owner == owner) {
            collider.center = center;
        }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }
}

impl ColliderQuery for ColliderSet {
    fn colliders(&self) -> &[Collider] {
        &self.colliders
    }
}
