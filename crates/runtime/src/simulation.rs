//! Frame-synchronous driver.
//!
//! [`Simulation`] owns every piece of mutable world state and advances it in
//! a fixed order each tick:
//!
//! 1. poll input and attempt casts
//! 2. advance cooldowns and cast state machines
//! 3. resolve finished casts (spawn hit-volumes or run instant queries)
//! 4. step live hit-volumes
//! 5. drop defeated combatants from collision
//! 6. notify observers with the drained events
use glam::Vec2;
use skill_content::LoadedCatalog;
use skill_core::{
    CastDispatch, CasterRefs, Collider, ColliderSet, CollisionMask, Combatants, DamageSink,
    DispatchEnv, EffectApplier, EntityId, EventQueue, HitContext, HitVolumeArena, SimEvent,
    SkillCaster, SkillConfig, SkillLibrary, StatKind, StatSheet, StatVector, Vitals,
};

use crate::error::{Result, RuntimeError};
use crate::input::InputSource;
use crate::observer::HudObserver;

/// Registration data for a damageable entity.
#[derive(Clone, Debug)]
pub struct ActorSpec {
    pub id: EntityId,
    pub name: String,
    pub mask: CollisionMask,
    /// Visual-space position.
    pub position: Vec2,
    /// Logical collider radius.
    pub radius: f32,
    pub stats: StatVector,
    /// Points the actor may still distribute with [`Simulation::allocate_stat`].
    pub unspent_points: u32,
    pub vitals: Vitals,
}

impl ActorSpec {
    pub fn new(id: EntityId, name: impl Into<String>, mask: CollisionMask, position: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            mask,
            position,
            radius: 0.5,
            stats: StatVector::default(),
            unspent_points: 0,
            vitals: Vitals::full(100.0, 100.0),
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: StatVector) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_unspent_points(mut self, points: u32) -> Self {
        self.unspent_points = points;
        self
    }

    #[must_use]
    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }
}

struct Actor {
    id: EntityId,
    position: Vec2,
    sheet: StatSheet,
    caster: Option<CasterSeat>,
}

struct CasterSeat {
    caster: SkillCaster,
    input: Box<dyn InputSource>,
    observer: Option<Box<dyn HudObserver>>,
}

pub struct Simulation {
    config: SkillConfig,
    library: SkillLibrary,
    actors: Vec<Actor>,
    colliders: ColliderSet,
    combatants: Combatants,
    arena: HitVolumeArena,
    events: EventQueue,
    time_scale: f32,
    frame: u64,
    elapsed: f32,
}

impl Simulation {
    pub fn new(config: SkillConfig, library: SkillLibrary, pooling: bool) -> Self {
        Self {
            combatants: Combatants::new(&config),
            config,
            library,
            actors: Vec::new(),
            colliders: ColliderSet::new(),
            arena: HitVolumeArena::new(pooling),
            events: EventQueue::new(),
            time_scale: 1.0,
            frame: 0,
            elapsed: 0.0,
        }
    }

    // ===== world setup =====

    /// Registers a damageable entity and its collider.
    pub fn add_actor(&mut self, spec: ActorSpec) -> Result<()> {
        if self.actor_index(spec.id).is_some() {
            return Err(RuntimeError::DuplicateEntity(spec.id));
        }

        self.colliders
            .insert(Collider::new(spec.id, spec.position, spec.radius, spec.mask));
        self.combatants.insert(EffectApplier::new(
            spec.id,
            spec.name.clone(),
            spec.vitals,
            &spec.stats,
        ));
        self.actors.push(Actor {
            id: spec.id,
            position: spec.position,
            sheet: StatSheet::new(spec.stats, spec.unspent_points),
            caster: None,
        });

        tracing::debug!(entity = %spec.id, name = %spec.name, "actor added");
        Ok(())
    }

    /// Static blocker; stops linear hit-volumes and instant single-target rays.
    pub fn add_obstacle(&mut self, id: EntityId, center: Vec2, radius: f32) {
        self.colliders
            .insert(Collider::new(id, center, radius, CollisionMask::OBSTACLE));
    }

    /// Gives an actor a skill caster driven by `input`.
    pub fn attach_caster(
        &mut self,
        id: EntityId,
        mask: CollisionMask,
        input: Box<dyn InputSource>,
    ) -> Result<&mut SkillCaster> {
        let index = self.actor_index(id).ok_or(RuntimeError::UnknownEntity(id))?;
        let actor = &mut self.actors[index];
        if actor.caster.is_some() {
            return Err(RuntimeError::DuplicateCaster(id));
        }

        let seat = actor.caster.insert(CasterSeat {
            caster: SkillCaster::new(id, mask, self.config.clone()),
            input,
            observer: None,
        });
        Ok(&mut seat.caster)
    }

    /// Replaces a caster's groups with the named catalog groups, in order.
    pub fn equip_groups(
        &mut self,
        id: EntityId,
        catalog: &LoadedCatalog,
        names: &[&str],
    ) -> Result<()> {
        let mut groups = Vec::with_capacity(names.len());
        for &name in names {
            let skills = catalog
                .resolve_group(name)
                .ok_or_else(|| RuntimeError::UnknownGroup(name.to_string()))?;
            groups.push((name, skills));
        }

        let caster = self.caster_mut(id).ok_or(RuntimeError::UnknownEntity(id))?;
        let stale = caster.groups().len();
        for (name, skills) in groups {
            caster.add_group(name, skills);
        }
        if caster.groups().len() > stale {
            for _ in 0..stale {
                caster.remove_group(0)?;
            }
        }
        Ok(())
    }

    pub fn set_observer(&mut self, id: EntityId, observer: Box<dyn HudObserver>) -> Result<()> {
        let seat = self
            .seat_mut(id)
            .ok_or(RuntimeError::UnknownEntity(id))?;
        seat.observer = Some(observer);
        Ok(())
    }

    /// Moves an actor and its collider.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> Result<()> {
        let index = self.actor_index(id).ok_or(RuntimeError::UnknownEntity(id))?;
        self.actors[index].position = position;
        self.colliders.set_owner_center(id, position);
        Ok(())
    }

    /// Spends unspent points on one attribute.
    ///
    /// The next cast reads the new totals, and the actor's mitigation follows
    /// its defense total immediately.
    pub fn allocate_stat(&mut self, id: EntityId, kind: StatKind, points: u32) -> Result<()> {
        let index = self.actor_index(id).ok_or(RuntimeError::UnknownEntity(id))?;
        let sheet = &mut self.actors[index].sheet;
        sheet.allocate(kind, points)?;

        if let Some(applier) = self.combatants.get_mut(id) {
            applier.defense = sheet.stats.defense_total();
        }
        tracing::debug!(
            entity = %id,
            stat = %kind,
            points,
            total = sheet.stats.total(kind),
            unspent = sheet.unspent_points(),
            "stat allocated"
        );
        Ok(())
    }

    // ===== controls =====

    /// Scales every subsequent `dt`; `0` freezes the world.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
        tracing::debug!(scale = self.time_scale, "time scale changed");
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Pauses or resumes one caster's state machine. Cooldowns keep running.
    pub fn set_caster_enabled(&mut self, id: EntityId, enabled: bool) -> Result<()> {
        self.caster_mut(id)
            .ok_or(RuntimeError::UnknownEntity(id))?
            .set_enabled(enabled);
        Ok(())
    }

    // ===== accessors =====

    pub fn caster(&self, id: EntityId) -> Option<&SkillCaster> {
        self.actors
            .iter()
            .find(|actor| actor.id == id)
            .and_then(|actor| actor.caster.as_ref())
            .map(|seat| &seat.caster)
    }

    pub fn caster_mut(&mut self, id: EntityId) -> Option<&mut SkillCaster> {
        self.seat_mut(id).map(|seat| &mut seat.caster)
    }

    pub fn stats(&self, id: EntityId) -> Option<&StatSheet> {
        self.actors
            .iter()
            .find(|actor| actor.id == id)
            .map(|actor| &actor.sheet)
    }

    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.actors
            .iter()
            .find(|actor| actor.id == id)
            .map(|actor| actor.position)
    }

    pub fn combatants(&self) -> &Combatants {
        &self.combatants
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn arena(&self) -> &HitVolumeArena {
        &self.arena
    }

    pub fn library(&self) -> &SkillLibrary {
        &self.library
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds, after time scaling.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn actor_index(&self, id: EntityId) -> Option<usize> {
        self.actors.iter().position(|actor| actor.id == id)
    }

    fn seat_mut(&mut self, id: EntityId) -> Option<&mut CasterSeat> {
        self.actors
            .iter_mut()
            .find(|actor| actor.id == id)
            .and_then(|actor| actor.caster.as_mut())
    }

    // ===== tick =====

    /// Advances the world by `dt` real seconds and returns the tick's events.
    pub fn tick(&mut self, dt: f32) -> Vec<SimEvent> {
        let dt = dt.max(0.0) * self.time_scale;

        if dt > 0.0 {
            self.frame += 1;
            self.elapsed += dt;

            self.poll_casts();
            let dispatches = self.advance_casters(dt);
            self.resolve(dispatches);

            let mut ctx = HitContext {
                colliders: &self.colliders,
                sink: &mut self.combatants,
                events: &mut self.events,
            };
            self.arena.tick(dt, &mut ctx);

            self.reap_defeated();
        }

        let drained = self.events.drain();
        self.notify(&drained);
        drained
    }

    fn poll_casts(&mut self) {
        let frame = self.frame;
        for actor in &mut self.actors {
            let Some(seat) = actor.caster.as_mut() else {
                continue;
            };
            let alive = self
                .combatants
                .get(actor.id)
                .is_some_and(|applier| applier.vitals.is_alive());

            seat.input.begin_frame(frame);
            if !alive {
                continue;
            }
            if seat.input.switch_group_pressed() {
                seat.caster.cycle_group();
            }

            for slot in 0..SkillConfig::SLOT_COUNT {
                if !seat.input.cast_pressed(slot) {
                    continue;
                }
                let refs = match self.combatants.get_mut(actor.id) {
                    Some(applier) => CasterRefs::new(&actor.sheet.stats, &mut applier.vitals.mp),
                    None => CasterRefs::missing(),
                };
                // Rejections are logged by the caster; the press is simply dropped.
                let Ok(start) = seat.caster.try_cast_slot(slot, refs) else {
                    continue;
                };

                self.events.push(SimEvent::CastStarted {
                    caster: actor.id,
                    skill: start.skill,
                    slot: start.slot,
                    cast_time: start.cast_time,
                    cooldown: start.cooldown,
                    mp_cost: start.mp_cost,
                });
                self.combatants.notify_vitals(actor.id, &mut self.events);
            }
        }
    }

    fn advance_casters(&mut self, dt: f32) -> Vec<(CastDispatch, Vec2, Vec2)> {
        let mut dispatches = Vec::new();
        for actor in &mut self.actors {
            let Some(seat) = actor.caster.as_mut() else {
                continue;
            };
            if let Some(dispatch) = seat.caster.tick(dt) {
                dispatches.push((dispatch, actor.position, seat.input.aim_direction()));
            }
        }
        dispatches
    }

    fn resolve(&mut self, dispatches: Vec<(CastDispatch, Vec2, Vec2)>) {
        let mut env = DispatchEnv {
            library: &self.library,
            arena: &mut self.arena,
            colliders: &self.colliders,
            sink: &mut self.combatants,
            events: &mut self.events,
        };
        for (dispatch, origin, aim) in dispatches {
            dispatch.resolve(origin, aim, &mut env);
        }
    }

    /// Defeated combatants stop being hittable and stop casting.
    fn reap_defeated(&mut self) {
        for actor in &mut self.actors {
            if !self.combatants.is_defeated(actor.id) {
                continue;
            }
            if self.colliders.remove_owner(actor.id) > 0 {
                tracing::info!(entity = %actor.id, "defeated");
            }
            if let Some(seat) = actor.caster.as_mut()
                && seat.caster.is_enabled()
            {
                seat.caster.set_enabled(false);
            }
        }
    }

    fn notify(&mut self, events: &[SimEvent]) {
        for actor in &mut self.actors {
            let Some(seat) = actor.caster.as_mut() else {
                continue;
            };
            if let Some(observer) = seat.observer.as_mut() {
                observer.on_slots(actor.id, &seat.caster.slot_views());
                observer.on_events(events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;

    fn sim() -> Simulation {
        let mut sim = Simulation::new(SkillConfig::default(), SkillLibrary::new(), true);
        sim.add_actor(ActorSpec::new(
            EntityId::PLAYER,
            "Player",
            CollisionMask::PLAYER,
            Vec2::ZERO,
        ))
        .unwrap();
        sim
    }

    #[test]
    fn duplicate_actor_is_rejected() {
        let mut sim = sim();
        let err = sim
            .add_actor(ActorSpec::new(
                EntityId::PLAYER,
                "Again",
                CollisionMask::PLAYER,
                Vec2::ZERO,
            ))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateEntity(_)));
    }

    #[test]
    fn caster_requires_actor() {
        let mut sim = sim();
        let input = Box::new(ScriptedInput::new(Vec2::X));
        assert!(matches!(
            sim.attach_caster(EntityId(7), CollisionMask::ENEMY, input),
            Err(RuntimeError::UnknownEntity(EntityId(7)))
        ));
    }

    #[test]
    fn frozen_time_does_not_advance() {
        let mut sim = sim();
        sim.set_time_scale(0.0);
        assert!(sim.tick(0.1).is_empty());
        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.elapsed(), 0.0);

        sim.set_time_scale(0.5);
        sim.tick(0.1);
        assert_eq!(sim.frame(), 1);
        assert!((sim.elapsed() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn allocation_spends_points_and_refreshes_defense() {
        let mut sim = Simulation::new(SkillConfig::default(), SkillLibrary::new(), true);
        sim.add_actor(
            ActorSpec::new(EntityId(3), "Knight", CollisionMask::ENEMY, Vec2::ZERO)
                .with_unspent_points(5),
        )
        .unwrap();

        sim.allocate_stat(EntityId(3), StatKind::Defense, 4).unwrap();

        let sheet = sim.stats(EntityId(3)).unwrap();
        assert_eq!(sheet.unspent_points(), 1);
        assert_eq!(sheet.stats.defense_total(), 14.0);
        assert_eq!(sim.combatants().get(EntityId(3)).unwrap().defense, 14.0);

        let err = sim.allocate_stat(EntityId(3), StatKind::Attack, 2).unwrap_err();
        assert!(matches!(err, RuntimeError::Allocation(_)));
        assert!(matches!(
            sim.allocate_stat(EntityId(8), StatKind::Attack, 1),
            Err(RuntimeError::UnknownEntity(EntityId(8)))
        ));
    }

    #[test]
    fn set_position_moves_collider() {
        let mut sim = sim();
        sim.set_position(EntityId::PLAYER, Vec2::new(2.0, 1.0)).unwrap();
        assert_eq!(sim.position(EntityId::PLAYER), Some(Vec2::new(2.0, 1.0)));
        assert_eq!(
            sim.colliders().iter().next().map(|c| c.center),
            Some(Vec2::new(2.0, 1.0))
        );
    }
}
