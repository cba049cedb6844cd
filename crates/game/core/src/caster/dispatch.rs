//! Resolving a finished cast against the world.
//!
//! A skill with a hit-volume template spawns a volume from the arena; the
//! volume then resolves its own hits tick by tick. A skill without one is
//! resolved immediately:
//!
//! - **Single**: first target along the aim ray within range, unless an
//!   obstacle is closer
//! - **Area**: every target inside the ellipse around the caster
//! - **Cone**: every target inside the logical cone around the aim

use std::cmp::Ordering;
use std::collections::BTreeSet;

use glam::Vec2;

use crate::collision::geometry::segment_circle_toi;
use crate::collision::{Collider, ColliderQuery, CollisionMask};
use crate::combat::{DamageSink, strike};
use crate::events::{EventQueue, SimEvent};
use crate::hitvolume::{HitVolumeArena, HitVolumeHandle, VolumeSpawn};
use crate::perspective::{in_cone, in_ellipse, logical_distance_sq, visual_step};
use crate::skill::{HitType, SkillLibrary};
use crate::types::EntityId;

use super::state::CastDispatch;

/// World access needed to resolve a cast.
pub struct DispatchEnv<'a> {
    pub library: &'a SkillLibrary,
    pub arena: &'a mut HitVolumeArena,
    pub colliders: &'a dyn ColliderQuery,
    pub sink: &'a mut dyn DamageSink,
    pub events: &'a mut EventQueue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub volume: Option<HitVolumeHandle>,
    /// Targets damaged immediately.
    pub hits: usize,
}

impl CastDispatch {
    /// Spawns the skill's hit-volume or runs its instant query.
    ///
    /// `origin` is the caster's visual position, `aim` a visual direction.
    pub fn resolve(&self, origin: Vec2, aim: Vec2, env: &mut DispatchEnv<'_>) -> DispatchOutcome {
        let aim = aim.normalize_or(Vec2::X);
        let template = self.skill.template.and_then(|id| {
            let template = env.library.template(id);
            if template.is_none() {
                tracing::warn!(skill = %self.skill.skill_id(), template = %id, "unknown hit-volume template; resolving instantly");
            }
            template
        });

        let outcome = match template {
            Some(template) => {
                let spawn = VolumeSpawn::from_cast(
                    self.caster,
                    origin,
                    aim,
                    &self.skill,
                    &self.computed,
                    self.caster_mask,
                );
                DispatchOutcome {
                    volume: Some(env.arena.acquire(template, spawn, env.events)),
                    hits: 0,
                }
            }
            None => DispatchOutcome {
                volume: None,
                hits: self.resolve_instant(origin, aim, env),
            },
        };

        env.events.push(SimEvent::CastResolved {
            caster: self.caster,
            skill: self.skill.skill_id().clone(),
            hit_type: self.skill.hit_type,
            volume: outcome.volume,
            hits: outcome.hits,
        });
        outcome
    }

    fn resolve_instant(&self, origin: Vec2, aim: Vec2, env: &mut DispatchEnv<'_>) -> usize {
        let target_mask = self.skill.target_type.target_mask(self.caster_mask);
        let standing: Vec<Collider> = env
            .colliders
            .colliders()
            .iter()
            .filter(|c| !env.sink.is_defeated(c.owner))
            .copied()
            .collect();
        let targets = match self.skill.hit_type {
            HitType::Single => self.ray_target(origin, aim, target_mask, &standing),
            HitType::Area => self.collect(origin, target_mask, &standing, |c| {
                in_ellipse(origin, c.center, self.computed.area_radius + c.radius)
            }),
            HitType::Cone => {
                let cone = self.computed.cone_angle.to_radians();
                self.collect(origin, target_mask, &standing, |c| {
                    in_cone(origin, aim, c.center, self.computed.range + c.radius, cone)
                })
            }
        };

        for &target in &targets {
            strike(
                &mut *env.sink,
                target,
                self.caster,
                self.computed.damage,
                &self.skill.on_hit,
                &mut *env.events,
            );
        }
        targets.len()
    }

    fn candidates<'c>(
        &self,
        target_mask: CollisionMask,
        colliders: &'c [Collider],
    ) -> impl Iterator<Item = &'c Collider> {
        let caster = self.caster;
        let layer = self.skill.target_layer;
        colliders
            .iter()
            .filter(move |c| c.owner != caster && c.accepts(target_mask, layer))
    }

    fn ray_target(
        &self,
        origin: Vec2,
        aim: Vec2,
        target_mask: CollisionMask,
        colliders: &[Collider],
    ) -> Vec<EntityId> {
        let end = origin + visual_step(aim, self.computed.range);
        let target = nearest_on_segment(origin, end, self.candidates(target_mask, colliders));
        let obstacle = nearest_on_segment(
            origin,
            end,
            colliders
                .iter()
                .filter(|c| c.owner != self.caster && c.is_obstacle(CollisionMask::OBSTACLE)),
        );

        match (target, obstacle) {
            (Some((t, _)), Some((blocked_at, _))) if blocked_at < t => Vec::new(),
            (Some((_, owner)), _) => vec![owner],
            (None, _) => Vec::new(),
        }
    }

    fn collect(
        &self,
        origin: Vec2,
        target_mask: CollisionMask,
        colliders: &[Collider],
        inside: impl Fn(&Collider) -> bool,
    ) -> Vec<EntityId> {
        let mut seen = BTreeSet::new();
        let mut hits: Vec<(f32, EntityId)> = self
            .candidates(target_mask, colliders)
            .filter(|&c| inside(c))
            .filter(|c| seen.insert(c.owner))
            .map(|c| (logical_distance_sq(origin, c.center), c.owner))
            .collect();

        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        hits.into_iter().map(|(_, owner)| owner).collect()
    }
}

/// First collider touched by the segment, by entry fraction.
fn nearest_on_segment<'c>(
    from: Vec2,
    to: Vec2,
    colliders: impl Iterator<Item = &'c Collider>,
) -> Option<(f32, EntityId)> {
    colliders
        .filter_map(|c| segment_circle_toi(from, to, c.center, c.radius).map(|t| (t, c.owner)))
        .min_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collision::ColliderSet;
    use crate::combat::{Combatants, EffectApplier};
    use crate::config::SkillConfig;
    use crate::hitvolume::{HitVolumeTemplate, MotionKind};
    use crate::perspective::to_visual;
    use crate::skill::{SkillCalculator, SkillDefinition, SkillType};
    use crate::stats::{StatVector, Vitals};
    use crate::types::TemplateId;

    struct World {
        library: SkillLibrary,
        arena: HitVolumeArena,
        colliders: ColliderSet,
        combatants: Combatants,
        events: EventQueue,
    }

    impl World {
        fn new() -> Self {
            Self {
                library: SkillLibrary::new(),
                arena: HitVolumeArena::new(true),
                colliders: ColliderSet::new(),
                combatants: Combatants::new(&SkillConfig::default()),
                events: EventQueue::new(),
            }
        }

        fn enemy(&mut self, id: u32, center: Vec2) {
            self.colliders
                .insert(Collider::new(EntityId(id), center, 0.5, CollisionMask::ENEMY));
            self.combatants.insert(EffectApplier::new(
                EntityId(id),
                format!("enemy-{id}"),
                Vitals::full(500.0, 0.0),
                &StatVector::default(),
            ));
        }

        fn resolve(&mut self, cast: &CastDispatch, aim: Vec2) -> DispatchOutcome {
            let mut env = DispatchEnv {
                library: &self.library,
                arena: &mut self.arena,
                colliders: &self.colliders,
                sink: &mut self.combatants,
                events: &mut self.events,
            };
            cast.resolve(Vec2::ZERO, aim, &mut env)
        }

        fn hp(&self, id: u32) -> f32 {
            self.combatants.get(EntityId(id)).unwrap().vitals.hp.current()
        }
    }

    fn cast(definition: SkillDefinition) -> CastDispatch {
        let computed = SkillCalculator::default().compute(&definition, &StatVector::default());
        CastDispatch {
            caster: EntityId::PLAYER,
            caster_mask: CollisionMask::PLAYER,
            skill: Arc::new(definition),
            computed,
            slot: 0,
        }
    }

    fn definition(hit_type: HitType) -> SkillDefinition {
        let mut def = SkillDefinition::new("test-skill", SkillType::Normal, 1, 1);
        def.hit_type = hit_type;
        def.base_damage = 40.0;
        def.range = 6.0;
        def.base_area_radius = 3.0;
        def.base_cone_angle = 90.0;
        def
    }

    #[test]
    fn single_hits_nearest_on_ray() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(4.0, 0.0));
        world.enemy(2, Vec2::new(2.0, 0.0));

        let outcome = world.resolve(&cast(definition(HitType::Single)), Vec2::X);

        assert_eq!(outcome.hits, 1);
        assert!(world.hp(2) < 500.0);
        assert_eq!(world.hp(1), 500.0);
    }

    #[test]
    fn single_passes_over_defeated_target() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(4.0, 0.0));
        world.enemy(2, Vec2::new(2.0, 0.0));
        world.combatants.get_mut(EntityId(2)).unwrap().vitals.hp.set(0.0);

        let outcome = world.resolve(&cast(definition(HitType::Single)), Vec2::X);

        assert_eq!(outcome.hits, 1);
        assert!(world.hp(1) < 500.0);
        assert!(
            !world
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::DamageApplied { target, .. } if *target == EntityId(2)))
        );
    }

    #[test]
    fn single_is_blocked_by_nearer_obstacle() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(4.0, 0.0));
        world
            .colliders
            .insert(Collider::new(EntityId(90), Vec2::new(2.0, 0.0), 0.5, CollisionMask::OBSTACLE));

        let outcome = world.resolve(&cast(definition(HitType::Single)), Vec2::X);

        assert_eq!(outcome.hits, 0);
        assert_eq!(world.hp(1), 500.0);
    }

    #[test]
    fn single_respects_range() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(9.0, 0.0));
        let outcome = world.resolve(&cast(definition(HitType::Single)), Vec2::X);
        assert_eq!(outcome.hits, 0);
    }

    #[test]
    fn area_hits_everything_in_ellipse() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(2.0, 0.0));
        world.enemy(2, Vec2::new(-1.0, 0.5));
        world.enemy(3, Vec2::new(0.0, 3.0)); // ~5.2 logical units away

        let outcome = world.resolve(&cast(definition(HitType::Area)), Vec2::X);

        assert_eq!(outcome.hits, 2);
        assert_eq!(world.hp(3), 500.0);
    }

    #[test]
    fn cone_hits_only_inside_logical_angle() {
        let mut world = World::new();
        world.enemy(1, to_visual(Vec2::from_angle(30f32.to_radians()) * 3.0));
        world.enemy(2, to_visual(Vec2::from_angle(120f32.to_radians()) * 3.0));

        let outcome = world.resolve(&cast(definition(HitType::Cone)), Vec2::X);

        assert_eq!(outcome.hits, 1);
        assert!(world.hp(1) < 500.0);
    }

    #[test]
    fn template_spawns_volume_instead_of_instant_hit() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(2.0, 0.0));
        world
            .library
            .insert_template(HitVolumeTemplate::new(TemplateId(4), MotionKind::Linear, 10.0, 1.0))
            .unwrap();
        let mut def = definition(HitType::Single);
        def.template = Some(TemplateId(4));

        let outcome = world.resolve(&cast(def), Vec2::X);

        assert_eq!(outcome.hits, 0);
        let handle = outcome.volume.expect("volume spawned");
        assert!(world.arena.is_live(handle));
        assert_eq!(world.hp(1), 500.0);
        assert!(world.events.iter().any(|e| matches!(e, SimEvent::HitVolumeSpawned { .. })));
        assert!(world.events.iter().any(|e| matches!(e, SimEvent::CastResolved { volume: Some(_), .. })));
    }

    #[test]
    fn missing_template_falls_back_to_instant_query() {
        let mut world = World::new();
        world.enemy(1, Vec2::new(2.0, 0.0));
        let mut def = definition(HitType::Single);
        def.template = Some(TemplateId(77));

        let outcome = world.resolve(&cast(def), Vec2::X);

        assert!(outcome.volume.is_none());
        assert_eq!(outcome.hits, 1);
    }
}
