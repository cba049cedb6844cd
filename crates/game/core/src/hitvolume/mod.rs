//! Hit-volume simulation.
//!
//! A hit-volume is a transient shape that moves for a bounded lifetime and
//! damages whatever it touches. There is one concrete [`HitVolume`] type; the
//! variant-specific behaviour lives in its [`Motion`].
//!
//! # Lifecycle
//!
//! ```text
//! Spawned ─▶ Active ─▶ Terminated(Expired | ObstacleTerminated
//!                                 | NonPiercingHit | SweepComplete) ─▶ Released
//! ```
//!
//! Termination is one-way. Released volumes may be reused by the
//! [`HitVolumeArena`], which re-initialises every field on reacquisition.

pub mod arena;
pub mod motion;
pub mod resolve;
pub mod template;

use std::collections::BTreeSet;

use glam::Vec2;

use crate::collision::{ColliderQuery, CollisionMask, InteractionLayer};
use crate::combat::DamageSink;
use crate::events::EventQueue;
use crate::skill::{ComputedSkill, SkillDefinition, StatusHook};
use crate::types::{EntityId, TemplateId};

pub use arena::{HitVolumeArena, HitVolumeHandle};
pub use motion::{Motion, MotionStep};
pub use template::{HitVolumeTemplate, MotionKind, Spin};

/// Remaining lifetime below which a volume counts as expired.
const EXPIRY_EPSILON: f32 = 1e-5;

/// Why a volume stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TerminationReason {
    Expired,
    ObstacleTerminated,
    NonPiercingHit,
    SweepComplete,
    /// Released by its owner while still active.
    Recalled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VolumePhase {
    Spawned,
    Active,
    Terminated(TerminationReason),
    Released,
}

impl VolumePhase {
    pub fn is_live(self) -> bool {
        matches!(self, Self::Spawned | Self::Active)
    }
}

/// Everything a dispatched cast contributes to a new volume.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeSpawn {
    pub owner: EntityId,
    /// Visual-space spawn point.
    pub origin: Vec2,
    /// Visual aim direction.
    pub aim: Vec2,
    pub damage: f32,
    /// Logical reach of a cone blade.
    pub range: f32,
    /// Logical radius of an area burst.
    pub area_radius: f32,
    /// Degrees.
    pub cone_angle: f32,
    pub target_mask: CollisionMask,
    pub target_layer: InteractionLayer,
    pub on_hit: Vec<StatusHook>,
}

impl VolumeSpawn {
    pub fn from_cast(
        owner: EntityId,
        origin: Vec2,
        aim: Vec2,
        definition: &SkillDefinition,
        computed: &ComputedSkill,
        caster_mask: CollisionMask,
    ) -> Self {
        Self {
            owner,
            origin,
            aim,
            damage: computed.damage,
            range: computed.range,
            area_radius: computed.area_radius,
            cone_angle: computed.cone_angle,
            target_mask: definition.target_type.target_mask(caster_mask),
            target_layer: definition.target_layer,
            on_hit: definition.on_hit.clone(),
        }
    }
}

/// Collaborators a volume needs while resolving hits.
pub struct HitContext<'a> {
    pub colliders: &'a dyn ColliderQuery,
    pub sink: &'a mut dyn DamageSink,
    pub events: &'a mut EventQueue,
}

/// One live (or pooled) hit-volume.
#[derive(Clone, Debug)]
pub struct HitVolume {
    owner: EntityId,
    template: TemplateId,
    origin: Vec2,
    position: Vec2,
    /// Logical angle the visual should face.
    facing: f32,
    /// Collision radius (linear/area) or blade half-thickness (cone).
    radius: f32,
    /// Blade length (cone).
    reach: f32,
    speed: f32,
    damage: f32,
    max_duration: f32,
    elapsed: f32,
    target_mask: CollisionMask,
    obstacle_mask: CollisionMask,
    target_layer: InteractionLayer,
    piercing: bool,
    history: BTreeSet<EntityId>,
    on_hit: Vec<StatusHook>,
    motion: Motion,
    phase: VolumePhase,
}

impl HitVolume {
    pub fn new(template: &HitVolumeTemplate, spawn: VolumeSpawn) -> Self {
        let motion = Self::motion_for(template, &spawn);
        Self {
            owner: spawn.owner,
            template: template.id,
            origin: spawn.origin,
            position: spawn.origin,
            facing: motion.initial_facing(),
            radius: Self::radius_for(template, &spawn),
            reach: spawn.range,
            speed: Self::speed_for(template),
            damage: spawn.damage.max(0.0),
            max_duration: template.max_duration.max(0.0),
            elapsed: 0.0,
            target_mask: spawn.target_mask,
            obstacle_mask: template.obstacle_mask,
            target_layer: spawn.target_layer,
            piercing: template.piercing,
            history: BTreeSet::new(),
            on_hit: spawn.on_hit,
            motion,
            phase: VolumePhase::Spawned,
        }
    }

    /// Re-initialises a pooled instance. Every field is overwritten.
    pub fn init(&mut self, template: &HitVolumeTemplate, spawn: VolumeSpawn) {
        *self = Self::new(template, spawn);
    }

    fn motion_for(template: &HitVolumeTemplate, spawn: &VolumeSpawn) -> Motion {
        match template.motion {
            MotionKind::Linear => Motion::linear(spawn.aim),
            MotionKind::Area => Motion::Area,
            MotionKind::Cone => Motion::cone(spawn.aim, spawn.cone_angle, template.spin),
        }
    }

    fn radius_for(template: &HitVolumeTemplate, spawn: &VolumeSpawn) -> f32 {
        match template.motion {
            MotionKind::Area if spawn.area_radius > 0.0 => spawn.area_radius,
            _ => template.radius.max(0.0),
        }
    }

    fn speed_for(template: &HitVolumeTemplate) -> f32 {
        match template.motion {
            MotionKind::Area => 0.0,
            _ => template.speed.max(0.0),
        }
    }

    /// Advances one tick: lifetime, movement, collision, expiry.
    ///
    /// Returns the termination reason on the tick the volume stops; later
    /// calls are no-ops.
    pub fn update(&mut self, dt: f32, ctx: &mut HitContext<'_>) -> Option<TerminationReason> {
        if !self.phase.is_live() {
            return None;
        }
        self.phase = VolumePhase::Active;

        let step_dt = dt.max(0.0).min((self.max_duration - self.elapsed).max(0.0));
        self.elapsed += step_dt;
        let expiring = self.max_duration - self.elapsed <= EXPIRY_EPSILON;
        if expiring {
            self.elapsed = self.max_duration;
        }

        let step = self.motion.advance(
            &mut self.position,
            &mut self.facing,
            self.speed,
            step_dt,
            expiring,
        );

        let reason = self.resolve_hits(step, ctx).or_else(|| {
            if self.motion.sweep_complete() {
                Some(TerminationReason::SweepComplete)
            } else if expiring {
                Some(TerminationReason::Expired)
            } else {
                None
            }
        })?;

        self.terminate(reason);
        Some(reason)
    }

    fn terminate(&mut self, reason: TerminationReason) {
        if self.phase.is_live() {
            tracing::trace!(owner = %self.owner, template = %self.template, %reason, "hit-volume terminated");
            self.phase = VolumePhase::Terminated(reason);
        }
    }

    pub(crate) fn mark_released(&mut self) {
        self.phase = VolumePhase::Released;
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn phase(&self) -> VolumePhase {
        self.phase
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        match self.phase {
            VolumePhase::Terminated(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn max_duration(&self) -> f32 {
        self.max_duration
    }

    pub fn is_piercing(&self) -> bool {
        self.piercing
    }

    pub fn has_hit(&self, entity: EntityId) -> bool {
        self.history.contains(&entity)
    }

    pub fn hit_count(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Collider, ColliderSet};
    use crate::combat::{Combatants, EffectApplier};
    use crate::config::SkillConfig;
    use crate::events::SimEvent;
    use crate::perspective::{logical_angle, to_logical};
    use crate::stats::{StatVector, Vitals};

    const CASTER: EntityId = EntityId(0);

    struct World {
        colliders: ColliderSet,
        combatants: Combatants,
        events: EventQueue,
    }

    impl World {
        fn new() -> Self {
            Self {
                colliders: ColliderSet::new(),
                combatants: Combatants::new(&SkillConfig::default()),
                events: EventQueue::new(),
            }
        }

        fn enemy(&mut self, id: u32, center: Vec2, radius: f32) {
            self.colliders
                .insert(Collider::new(EntityId(id), center, radius, CollisionMask::ENEMY));
            self.combatants.insert(EffectApplier::new(
                EntityId(id),
                format!("enemy-{id}"),
                Vitals::full(1_000.0, 0.0),
                &StatVector::default(),
            ));
        }

        fn wall(&mut self, id: u32, center: Vec2, radius: f32) {
            self.colliders
                .insert(Collider::new(EntityId(id), center, radius, CollisionMask::OBSTACLE));
        }

        fn run(&mut self, volume: &mut HitVolume, dt: f32, max_ticks: usize) -> Option<TerminationReason> {
            for _ in 0..max_ticks {
                let mut ctx = HitContext {
                    colliders: &self.colliders,
                    sink: &mut self.combatants,
                    events: &mut self.events,
                };
                if let Some(reason) = volume.update(dt, &mut ctx) {
                    return Some(reason);
                }
            }
            None
        }

        fn damage_events(&self) -> Vec<EntityId> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    SimEvent::DamageApplied { target, .. } => Some(*target),
                    _ => None,
                })
                .collect()
        }
    }

    fn spawn(aim: Vec2) -> VolumeSpawn {
        VolumeSpawn {
            owner: CASTER,
            origin: Vec2::ZERO,
            aim,
            damage: 50.0,
            range: 5.0,
            area_radius: 3.0,
            cone_angle: 90.0,
            target_mask: CollisionMask::ENEMY,
            target_layer: InteractionLayer::BODY,
            on_hit: Vec::new(),
        }
    }

    fn bolt(speed: f32, max_duration: f32) -> HitVolumeTemplate {
        HitVolumeTemplate::new(TemplateId(1), MotionKind::Linear, speed, max_duration)
            .with_radius(0.25)
    }

    #[test]
    fn linear_travels_full_range_then_expires() {
        for dt in [1.0 / 60.0, 1.0 / 144.0, 0.3, 0.7] {
            let mut world = World::new();
            let mut volume = HitVolume::new(&bolt(10.0, 2.0), spawn(Vec2::X));

            let reason = world.run(&mut volume, dt, 1_000);

            assert_eq!(reason, Some(TerminationReason::Expired), "dt {dt}");
            assert_eq!(volume.elapsed(), 2.0);
            assert!((volume.position().x - 20.0).abs() < 1e-3, "dt {dt}: {}", volume.position());
        }
    }

    #[test]
    fn fast_linear_does_not_tunnel() {
        let mut world = World::new();
        world.enemy(7, Vec2::new(25.0, 0.0), 0.1);
        let mut volume = HitVolume::new(&bolt(600.0, 1.0), spawn(Vec2::X));

        let reason = world.run(&mut volume, 0.1, 20);

        assert_eq!(reason, Some(TerminationReason::NonPiercingHit));
        assert_eq!(world.damage_events(), vec![EntityId(7)]);
    }

    #[test]
    fn non_piercing_stops_after_first_target() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(3.0, 0.0), 0.5);
        world.enemy(2, Vec2::new(6.0, 0.0), 0.5);
        let mut volume = HitVolume::new(&bolt(10.0, 2.0), spawn(Vec2::X));

        assert_eq!(
            world.run(&mut volume, 1.0 / 60.0, 500),
            Some(TerminationReason::NonPiercingHit)
        );
        assert_eq!(world.damage_events(), vec![EntityId(1)]);
        assert_eq!(volume.hit_count(), 1);
    }

    #[test]
    fn non_piercing_passes_over_defeated_target() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(3.0, 0.0), 0.5);
        world.enemy(2, Vec2::new(6.0, 0.0), 0.5);
        world.combatants.get_mut(EntityId(1)).unwrap().vitals.hp.set(0.0);
        let mut volume = HitVolume::new(&bolt(10.0, 2.0), spawn(Vec2::X));

        assert_eq!(
            world.run(&mut volume, 1.0 / 60.0, 500),
            Some(TerminationReason::NonPiercingHit)
        );
        assert_eq!(world.damage_events(), vec![EntityId(2)]);
        assert!(!volume.has_hit(EntityId(1)));
        assert!(world.combatants.get(EntityId(2)).unwrap().vitals.hp.current() < 1_000.0);
    }

    #[test]
    fn diagonal_linear_faces_logical_angle() {
        let aim = Vec2::new(1.0, 1.0);
        let mut world = World::new();
        let mut volume = HitVolume::new(&bolt(10.0, 2.0), spawn(aim));

        assert_eq!(world.run(&mut volume, 0.1, 5), None);

        // Vertical compression turns a 45° visual aim into 60° logical.
        assert!((volume.facing() - logical_angle(aim)).abs() < 1e-5);
        assert!((volume.facing() - 60f32.to_radians()).abs() < 1e-4);
        let travelled = to_logical(volume.position());
        assert!((travelled.length() - 5.0).abs() < 1e-3);
        assert!((travelled.y.atan2(travelled.x) - volume.facing()).abs() < 1e-4);
    }

    #[test]
    fn piercing_hits_each_target_once() {
        let mut world = World::new();
        for (id, x) in [(1, 3.0), (2, 6.0), (3, 9.0)] {
            world.enemy(id, Vec2::new(x, 0.0), 0.5);
        }
        let mut volume = HitVolume::new(&bolt(10.0, 2.0).piercing(true), spawn(Vec2::X));

        assert_eq!(
            world.run(&mut volume, 1.0 / 60.0, 500),
            Some(TerminationReason::Expired)
        );
        assert_eq!(
            world.damage_events(),
            vec![EntityId(1), EntityId(2), EntityId(3)]
        );
    }

    #[test]
    fn linear_stops_at_obstacle_before_target() {
        let mut world = World::new();
        world.wall(50, Vec2::new(4.0, 0.0), 0.5);
        world.enemy(1, Vec2::new(6.0, 0.0), 0.5);
        let mut volume = HitVolume::new(&bolt(10.0, 2.0), spawn(Vec2::X));

        assert_eq!(
            world.run(&mut volume, 0.5, 10),
            Some(TerminationReason::ObstacleTerminated)
        );
        assert!(world.damage_events().is_empty());
        assert!((volume.position().x - 3.25).abs() < 1e-4);
    }

    #[test]
    fn owner_is_never_hit() {
        let mut world = World::new();
        world.enemy(0, Vec2::ZERO, 1.0);
        let template = HitVolumeTemplate::new(TemplateId(2), MotionKind::Area, 0.0, 0.2);
        let mut volume = HitVolume::new(&template, spawn(Vec2::X));

        assert_eq!(
            world.run(&mut volume, 0.1, 10),
            Some(TerminationReason::Expired)
        );
        assert!(world.damage_events().is_empty());
    }

    #[test]
    fn area_ignores_obstacles_and_filters_layers() {
        let mut world = World::new();
        world.wall(50, Vec2::new(1.0, 0.0), 0.5);
        world.enemy(1, Vec2::new(2.0, 0.0), 0.5);
        world.colliders.insert(
            Collider::new(EntityId(2), Vec2::new(-1.0, 0.0), 0.5, CollisionMask::ENEMY)
                .with_layer(InteractionLayer::FEET),
        );
        let template =
            HitVolumeTemplate::new(TemplateId(2), MotionKind::Area, 99.0, 0.3).piercing(true);
        let mut volume = HitVolume::new(&template, spawn(Vec2::X));

        assert_eq!(
            world.run(&mut volume, 0.1, 10),
            Some(TerminationReason::Expired)
        );
        assert_eq!(world.damage_events(), vec![EntityId(1)]);
        assert_eq!(volume.position(), Vec2::ZERO);
    }

    #[test]
    fn cone_sweep_is_complete_at_any_frame_rate() {
        let template = HitVolumeTemplate::new(TemplateId(3), MotionKind::Cone, 200.0, 0.5);
        for dt in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 144.0, 0.07, 0.5] {
            let mut world = World::new();
            let mut volume = HitVolume::new(&template, spawn(Vec2::X));

            let reason = world.run(&mut volume, dt, 1_000);

            assert_eq!(reason, Some(TerminationReason::SweepComplete), "dt {dt}");
            assert!(
                (volume.motion().rotation_applied() - 90f32.to_radians()).abs() < 1e-5,
                "dt {dt}"
            );
            assert!(volume.elapsed() <= 0.5);
        }
    }

    #[test]
    fn slow_cone_finishes_sweep_on_expiry() {
        // 100°/s for 0.5 s only covers 50°; the last tick snaps the rest.
        let template = HitVolumeTemplate::new(TemplateId(3), MotionKind::Cone, 100.0, 0.5);
        let mut world = World::new();
        let mut volume = HitVolume::new(&template, spawn(Vec2::X));

        world.run(&mut volume, 0.1, 100);

        assert_eq!(volume.elapsed(), 0.5);
        assert!((volume.motion().rotation_applied() - 90f32.to_radians()).abs() < 1e-5);
        assert!(!volume.phase().is_live());
    }

    #[test]
    fn cone_hits_targets_inside_sweep_only() {
        let mut world = World::new();
        // 30° off the aim, inside the 90° sweep; and 80° off, outside it.
        world.enemy(1, crate::perspective::to_visual(Vec2::from_angle(30f32.to_radians()) * 3.0), 0.3);
        world.enemy(2, crate::perspective::to_visual(Vec2::from_angle(80f32.to_radians()) * 3.0), 0.3);
        let template =
            HitVolumeTemplate::new(TemplateId(3), MotionKind::Cone, 180.0, 1.0).piercing(true);
        let mut volume = HitVolume::new(&template, spawn(Vec2::X));

        world.run(&mut volume, 1.0 / 60.0, 200);

        assert_eq!(world.damage_events(), vec![EntityId(1)]);
    }
}
