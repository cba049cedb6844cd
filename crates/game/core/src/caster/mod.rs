//! Cast orchestrator.
//!
//! A [`SkillCaster`] owns any number of [`SkillGroup`]s and two input slots.
//! Slots hold a position *within the active group*, so switching groups
//! changes what each slot casts without rebinding input.
//!
//! # Cast gates
//!
//! `try_cast_slot` checks, in order: enabled, idle, stat/mana references,
//! slot binding, cast requirements (minimums only), cooldown, mana. A failed
//! gate returns a [`CastError`] and mutates nothing; there is no queue.
//!
//! # Time
//!
//! `tick` ticks every group's cooldowns regardless of which group is active.
//! The cast countdown only advances while the caster is enabled and `dt > 0`.

pub mod cooldown;
pub mod dispatch;
pub mod error;
pub mod group;
pub mod state;

use std::sync::Arc;

use crate::collision::CollisionMask;
use crate::config::SkillConfig;
use crate::error::GameError;
use crate::skill::{SkillCalculator, SkillDefinition, SkillId};
use crate::stats::{ResourceMeter, StatVector};
use crate::types::EntityId;

pub use cooldown::CooldownBank;
pub use dispatch::{DispatchEnv, DispatchOutcome};
pub use error::{CastError, GroupError};
pub use group::SkillGroup;
pub use state::{CastDispatch, CastStart, CastState, PendingCast};

/// Live collaborators a cast attempt reads and writes.
///
/// Either may be absent (e.g. the caster's entity is not spawned yet); the
/// attempt is then rejected with [`CastError::MissingReferences`].
pub struct CasterRefs<'a> {
    pub stats: Option<&'a StatVector>,
    pub mana: Option<&'a mut ResourceMeter>,
}

impl<'a> CasterRefs<'a> {
    pub fn new(stats: &'a StatVector, mana: &'a mut ResourceMeter) -> Self {
        Self {
            stats: Some(stats),
            mana: Some(mana),
        }
    }

    pub fn missing() -> Self {
        Self {
            stats: None,
            mana: None,
        }
    }
}

/// What an observer needs to draw one slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotView {
    pub slot: usize,
    pub skill: Option<SkillId>,
    pub remaining: f32,
    pub max: f32,
    pub casting: bool,
}

#[derive(Clone, Debug)]
pub struct SkillCaster {
    id: EntityId,
    mask: CollisionMask,
    calculator: SkillCalculator,
    groups: Vec<SkillGroup>,
    active_group: usize,
    slots: [Option<usize>; SkillConfig::SLOT_COUNT],
    state: CastState,
    enabled: bool,
}

impl SkillCaster {
    /// A caster with one empty group and slots bound to positions 0 and 1.
    pub fn new(id: EntityId, mask: CollisionMask, config: SkillConfig) -> Self {
        Self {
            id,
            mask,
            calculator: SkillCalculator::new(config),
            groups: vec![SkillGroup::new("default", Vec::new())],
            active_group: 0,
            slots: std::array::from_fn(Some),
            state: CastState::Idle,
            enabled: true,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn mask(&self) -> CollisionMask {
        self.mask
    }

    pub fn calculator(&self) -> &SkillCalculator {
        &self.calculator
    }

    pub fn state(&self) -> &CastState {
        &self.state
    }

    pub fn is_casting(&self) -> bool {
        self.state.is_casting()
    }

    /// Casting or recovering.
    pub fn is_busy(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pausing freezes an in-flight cast without resetting it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ===== groups =====

    pub fn groups(&self) -> &[SkillGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&SkillGroup> {
        self.groups.get(index)
    }

    pub fn active_group(&self) -> usize {
        self.active_group
    }

    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        skills: Vec<Option<Arc<SkillDefinition>>>,
    ) -> usize {
        self.groups.push(SkillGroup::new(name, skills));
        self.groups.len() - 1
    }

    pub fn remove_group(&mut self, index: usize) -> Result<SkillGroup, GroupError> {
        self.check_group(index)?;
        if self.groups.len() == 1 {
            return Err(GroupError::LastGroup);
        }
        let removed = self.groups.remove(index);
        if self.active_group > index || self.active_group >= self.groups.len() {
            self.active_group = self.active_group.saturating_sub(1);
        }
        Ok(removed)
    }

    pub fn set_group_skills(
        &mut self,
        group: usize,
        skills: Vec<Option<Arc<SkillDefinition>>>,
    ) -> Result<(), GroupError> {
        self.group_mut(group)?.replace_skills(skills);
        Ok(())
    }

    pub fn set_skill(
        &mut self,
        group: usize,
        index: usize,
        skill: Option<Arc<SkillDefinition>>,
    ) -> Result<(), GroupError> {
        self.group_mut(group)?.put(index, skill);
        Ok(())
    }

    /// Places a skill after checking its learn requirements (minimums and
    /// maximums).
    pub fn learn_skill(
        &mut self,
        group: usize,
        index: usize,
        skill: Arc<SkillDefinition>,
        stats: &StatVector,
    ) -> Result<(), GroupError> {
        skill
            .requirements
            .check_learn(stats)
            .map_err(GroupError::RequirementNotMet)?;
        self.set_skill(group, index, Some(skill))
    }

    pub fn switch_group(&mut self, index: usize) -> Result<(), GroupError> {
        self.check_group(index)?;
        self.active_group = index;
        tracing::debug!(caster = %self.id, group = index, "switched skill group");
        Ok(())
    }

    /// Advances to the next group, wrapping around. Returns the new index.
    pub fn cycle_group(&mut self) -> usize {
        if !self.groups.is_empty() {
            self.active_group = (self.active_group + 1) % self.groups.len();
        }
        tracing::debug!(caster = %self.id, group = self.active_group, "cycled skill group");
        self.active_group
    }

    pub fn bind_slot(&mut self, slot: usize, position: Option<usize>) -> Result<(), GroupError> {
        let binding = self
            .slots
            .get_mut(slot)
            .ok_or(GroupError::SlotOutOfRange { slot })?;
        *binding = position;
        Ok(())
    }

    pub fn slot_binding(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    fn check_group(&self, index: usize) -> Result<(), GroupError> {
        if index < self.groups.len() {
            Ok(())
        } else {
            Err(GroupError::GroupOutOfRange {
                index,
                count: self.groups.len(),
            })
        }
    }

    fn group_mut(&mut self, index: usize) -> Result<&mut SkillGroup, GroupError> {
        let count = self.groups.len();
        self.groups
            .get_mut(index)
            .ok_or(GroupError::GroupOutOfRange { index, count })
    }

    // ===== casting =====

    /// Attempts to start the skill bound to `slot`.
    pub fn try_cast_slot(
        &mut self,
        slot: usize,
        refs: CasterRefs<'_>,
    ) -> Result<CastStart, CastError> {
        let result = self.start_cast(slot, refs);
        if let Err(err) = &result {
            let severity = err.severity();
            if severity.is_internal() {
                tracing::warn!(
                    caster = %self.id,
                    slot,
                    code = err.error_code(),
                    error = %err,
                    "cast rejected"
                );
            } else if severity.is_recoverable() {
                // Polled every frame while a button is held.
                tracing::trace!(
                    caster = %self.id,
                    slot,
                    code = err.error_code(),
                    error = %err,
                    "cast rejected"
                );
            } else {
                tracing::debug!(
                    caster = %self.id,
                    slot,
                    code = err.error_code(),
                    severity = severity.as_str(),
                    error = %err,
                    "cast rejected"
                );
            }
        }
        result
    }

    fn start_cast(&mut self, slot: usize, refs: CasterRefs<'_>) -> Result<CastStart, CastError> {
        if !self.enabled {
            return Err(CastError::Disabled);
        }
        if !self.state.is_idle() {
            return Err(CastError::AlreadyCasting);
        }
        let (Some(stats), Some(mana)) = (refs.stats, refs.mana) else {
            return Err(CastError::MissingReferences);
        };

        let group_index = self.active_group;
        let group = self
            .groups
            .get(group_index)
            .ok_or(CastError::NoActiveGroup)?;
        let index = self
            .slots
            .get(slot)
            .ok_or(CastError::SlotOutOfRange { slot })?
            .ok_or(CastError::SlotUnbound { slot })?;
        if index >= group.len() {
            return Err(CastError::IndexOutOfRange {
                index,
                len: group.len(),
            });
        }
        let skill = group
            .skill(index)
            .cloned()
            .ok_or(CastError::EmptySlot { index })?;

        if skill.is_passive() {
            return Err(CastError::PassiveSkill(skill.skill_id().clone()));
        }
        skill
            .requirements
            .check_cast(stats)
            .map_err(CastError::RequirementNotMet)?;

        let remaining = group.cooldowns().remaining(index);
        if remaining > 0.0 {
            return Err(CastError::OnCooldown { remaining });
        }

        let computed = self.calculator.compute(&skill, stats);
        if mana.current() < computed.mp_cost {
            return Err(CastError::InsufficientMana {
                required: computed.mp_cost,
                available: mana.current(),
            });
        }

        // All gates passed; from here on the attempt commits.
        mana.try_spend(computed.mp_cost);
        self.groups[group_index]
            .cooldowns_mut()
            .arm(index, computed.cooldown);

        let start = CastStart {
            skill: skill.skill_id().clone(),
            slot,
            cast_time: computed.cast_time,
            cooldown: computed.cooldown,
            mp_cost: computed.mp_cost,
        };
        tracing::debug!(
            caster = %self.id,
            skill = %start.skill,
            slot,
            cast_time = computed.cast_time,
            cooldown = computed.cooldown,
            mp_cost = computed.mp_cost,
            "cast started"
        );

        self.state = CastState::Casting(PendingCast {
            skill,
            computed,
            group: group_index,
            index,
            slot,
            remaining: computed.cast_time,
        });
        Ok(start)
    }

    /// Advances cooldowns and the cast state machine by `dt` seconds.
    ///
    /// Returns the finished cast on the tick its countdown reaches zero.
    pub fn tick(&mut self, dt: f32) -> Option<CastDispatch> {
        let dt = dt.max(0.0);
        for group in &mut self.groups {
            group.cooldowns_mut().tick(dt);
        }

        if !self.enabled || dt <= 0.0 {
            return None;
        }

        match &mut self.state {
            CastState::Idle => None,
            CastState::Recovering { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.state = CastState::Idle;
                }
                None
            }
            CastState::Casting(pending) => {
                pending.remaining -= dt;
                if pending.remaining > 0.0 {
                    return None;
                }

                let recovery = pending.computed.recovery_time;
                let finished = std::mem::replace(
                    &mut self.state,
                    if recovery > 0.0 {
                        CastState::Recovering {
                            remaining: recovery,
                        }
                    } else {
                        CastState::Idle
                    },
                );
                let CastState::Casting(pending) = finished else {
                    return None;
                };

                tracing::debug!(caster = %self.id, skill = %pending.skill.skill_id(), "cast resolved");
                Some(CastDispatch {
                    caster: self.id,
                    caster_mask: self.mask,
                    skill: pending.skill,
                    computed: pending.computed,
                    slot: pending.slot,
                })
            }
        }
    }

    /// Active group's slots, for observers.
    pub fn slot_views(&self) -> Vec<SlotView> {
        let group = self.groups.get(self.active_group);
        let pending = self.state.pending();

        self.slots
            .iter()
            .enumerate()
            .map(|(slot, binding)| {
                let position = *binding;
                let skill = position
                    .and_then(|index| group.and_then(|g| g.skill(index)))
                    .map(|skill| skill.skill_id().clone());
                let (remaining, max) = match (group, position) {
                    (Some(group), Some(index)) => (
                        group.cooldowns().remaining(index),
                        group.cooldowns().max(index),
                    ),
                    _ => (0.0, 0.0),
                };
                let casting = pending.is_some_and(|p| {
                    p.group == self.active_group && Some(p.index) == position
                });

                SlotView {
                    slot,
                    skill,
                    remaining,
                    max,
                    casting,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{SkillType, StatRange};
    use crate::stats::{BASE_STAT, StatKind};

    fn skill(serial: u16, cooldown: f32, mp: f32, cast_time: f32) -> Arc<SkillDefinition> {
        let mut def = SkillDefinition::new(format!("skill-{serial}"), SkillType::Normal, 1, serial);
        def.base_damage = 10.0;
        def.base_cooldown = cooldown;
        def.base_mp_cost = mp;
        def.cast_time = cast_time;
        Arc::new(def)
    }

    fn caster_with(skills: Vec<Option<Arc<SkillDefinition>>>) -> SkillCaster {
        let mut caster = SkillCaster::new(EntityId::PLAYER, CollisionMask::PLAYER, SkillConfig::default());
        caster.set_group_skills(0, skills).unwrap();
        caster
    }

    // Technique total 0 would need negative raw; use the curve directly.
    fn cooldown_of(caster: &SkillCaster, base: f32) -> f32 {
        base * caster.calculator().technique_curve(BASE_STAT)
    }

    #[test]
    fn successful_cast_spends_mana_and_arms_cooldown() {
        let mut caster = caster_with(vec![Some(skill(1, 4.0, 20.0, 0.5))]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(100.0);

        let start = caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap();

        assert!(caster.is_casting());
        assert!((mana.current() - (100.0 - start.mp_cost)).abs() < 1e-4);
        let group = caster.group(0).unwrap();
        assert!((group.cooldowns().remaining(0) - cooldown_of(&caster, 4.0)).abs() < 1e-4);
        assert_eq!(group.cooldowns().remaining(0), group.cooldowns().max(0));
    }

    #[test]
    fn rejected_casts_mutate_nothing() {
        let mut gated = SkillDefinition::new("gated", SkillType::Normal, 1, 9);
        gated.requirements = gated
            .requirements
            .with(StatKind::Attack, StatRange::at_least(50.0));
        let mut caster = caster_with(vec![Some(skill(1, 4.0, 500.0, 0.5)), Some(Arc::new(gated))]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(100.0);

        let err = caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap_err();
        assert!(matches!(err, CastError::InsufficientMana { .. }));

        let err = caster
            .try_cast_slot(1, CasterRefs::new(&stats, &mut mana))
            .unwrap_err();
        assert!(matches!(err, CastError::RequirementNotMet(_)));

        assert_eq!(mana.current(), 100.0);
        assert!(caster.state().is_idle());
        assert!(caster.group(0).unwrap().cooldowns().is_ready(0));
    }

    #[test]
    fn gate_order_matches_documented_sequence() {
        let mut caster = caster_with(vec![None]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(100.0);

        assert_eq!(
            caster.try_cast_slot(0, CasterRefs::missing()).unwrap_err(),
            CastError::MissingReferences
        );
        assert_eq!(
            caster
                .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
                .unwrap_err(),
            CastError::EmptySlot { index: 0 }
        );
        assert_eq!(
            caster
                .try_cast_slot(1, CasterRefs::new(&stats, &mut mana))
                .unwrap_err(),
            CastError::IndexOutOfRange { index: 1, len: 1 }
        );
        caster.bind_slot(1, None).unwrap();
        assert_eq!(
            caster
                .try_cast_slot(1, CasterRefs::new(&stats, &mut mana))
                .unwrap_err(),
            CastError::SlotUnbound { slot: 1 }
        );
        assert_eq!(
            caster
                .try_cast_slot(2, CasterRefs::new(&stats, &mut mana))
                .unwrap_err(),
            CastError::SlotOutOfRange { slot: 2 }
        );

        caster.set_enabled(false);
        assert_eq!(
            caster.try_cast_slot(0, CasterRefs::missing()).unwrap_err(),
            CastError::Disabled
        );
    }

    #[test]
    fn second_cast_while_casting_is_rejected() {
        let mut caster = caster_with(vec![
            Some(skill(1, 1.0, 0.0, 1.0)),
            Some(skill(2, 1.0, 0.0, 1.0)),
        ]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(10.0);

        caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap();
        let err = caster
            .try_cast_slot(1, CasterRefs::new(&stats, &mut mana))
            .unwrap_err();

        assert_eq!(err, CastError::AlreadyCasting);
        assert!(caster.group(0).unwrap().cooldowns().is_ready(1));
    }

    #[test]
    fn cast_resolves_after_cast_time_then_recovers() {
        let mut def = SkillDefinition::new("heavy", SkillType::Normal, 2, 3);
        def.cast_time = 0.5;
        def.recovery_time = 0.25;
        let mut caster = caster_with(vec![Some(Arc::new(def))]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(10.0);
        caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap();

        assert!(caster.tick(0.25).is_none());
        let dispatch = caster.tick(0.25).expect("cast should resolve");
        assert_eq!(dispatch.skill.skill_id().as_str(), "N02-0003");
        assert_eq!(dispatch.caster, EntityId::PLAYER);

        assert!(caster.is_busy());
        assert!(!caster.is_casting());
        assert_eq!(
            caster
                .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
                .unwrap_err(),
            CastError::AlreadyCasting
        );
        caster.tick(0.25);
        assert!(caster.state().is_idle());
    }

    #[test]
    fn disabled_or_frozen_caster_holds_cast_countdown() {
        let mut caster = caster_with(vec![Some(skill(1, 5.0, 0.0, 1.0))]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(10.0);
        caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap();
        caster.tick(0.5);

        caster.set_enabled(false);
        for _ in 0..10 {
            assert!(caster.tick(0.5).is_none());
        }
        for _ in 0..10 {
            assert!(caster.tick(0.0).is_none());
        }
        // Cooldowns kept ticking while disabled.
        assert!(caster.group(0).unwrap().cooldowns().is_ready(0));

        caster.set_enabled(true);
        let pending = caster.state().pending().unwrap();
        assert!((pending.remaining - 0.5).abs() < 1e-6);
        assert!(caster.tick(0.5).is_some());
    }

    #[test]
    fn inactive_groups_keep_cooling_down() {
        let mut caster = caster_with(vec![Some(skill(1, 2.0, 0.0, 0.0))]);
        let second = caster.add_group("second", vec![Some(skill(2, 1.0, 0.0, 0.0))]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(10.0);

        caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap();
        caster.tick(0.1);
        caster.switch_group(second).unwrap();

        let before = caster.group(0).unwrap().cooldowns().remaining(0);
        caster.tick(0.5);
        let after = caster.group(0).unwrap().cooldowns().remaining(0);
        assert!(after < before);

        // Observers only see the active group.
        let views = caster.slot_views();
        assert_eq!(views.len(), SkillConfig::SLOT_COUNT);
        assert_eq!(views[0].skill.as_ref().unwrap().as_str(), "N01-0002");
        assert_eq!(views[0].remaining, 0.0);
    }

    #[test]
    fn slot_view_flags_casting_slot() {
        let mut caster = caster_with(vec![
            Some(skill(1, 1.0, 0.0, 1.0)),
            Some(skill(2, 1.0, 0.0, 1.0)),
        ]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(10.0);
        caster
            .try_cast_slot(1, CasterRefs::new(&stats, &mut mana))
            .unwrap();

        let views = caster.slot_views();
        assert!(!views[0].casting);
        assert!(views[1].casting);
        assert!(views[1].max > 0.0);
    }

    #[test]
    fn composition_changes_resize_cooldowns() {
        let mut caster = caster_with(vec![Some(skill(1, 3.0, 0.0, 0.0))]);
        let stats = StatVector::default();
        let mut mana = ResourceMeter::full(10.0);
        caster
            .try_cast_slot(0, CasterRefs::new(&stats, &mut mana))
            .unwrap();

        caster.set_skill(0, 3, Some(skill(4, 1.0, 0.0, 0.0))).unwrap();
        let group = caster.group(0).unwrap();
        assert_eq!(group.len(), 4);
        assert_eq!(group.cooldowns().len(), 4);
        assert!(group.cooldowns().is_ready(0));

        caster.set_group_skills(0, Vec::new()).unwrap();
        assert_eq!(caster.group(0).unwrap().cooldowns().len(), 0);
    }

    #[test]
    fn learn_checks_caps_but_cast_does_not() {
        let mut capped = SkillDefinition::new("capped", SkillType::Normal, 1, 5);
        capped.requirements = capped
            .requirements
            .with(StatKind::Agility, StatRange::at_most(20.0));
        let capped = Arc::new(capped);

        let mut caster = caster_with(Vec::new());
        let nimble = StatVector::default().with(StatKind::Agility, 40.0);
        let err = caster
            .learn_skill(0, 0, Arc::clone(&capped), &nimble)
            .unwrap_err();
        assert!(matches!(err, GroupError::RequirementNotMet(_)));

        caster
            .learn_skill(0, 0, Arc::clone(&capped), &StatVector::default())
            .unwrap();
        let mut mana = ResourceMeter::full(10.0);
        assert!(
            caster
                .try_cast_slot(0, CasterRefs::new(&nimble, &mut mana))
                .is_ok()
        );
    }

    #[test]
    fn group_management_bounds() {
        let mut caster = caster_with(Vec::new());
        assert_eq!(caster.remove_group(0).unwrap_err(), GroupError::LastGroup);
        assert!(matches!(
            caster.switch_group(3),
            Err(GroupError::GroupOutOfRange { index: 3, count: 1 })
        ));

        caster.add_group("b", Vec::new());
        caster.add_group("c", Vec::new());
        assert_eq!(caster.cycle_group(), 1);
        assert_eq!(caster.cycle_group(), 2);
        assert_eq!(caster.cycle_group(), 0);

        caster.switch_group(2).unwrap();
        caster.remove_group(2).unwrap();
        assert_eq!(caster.active_group(), 1);
    }
}
