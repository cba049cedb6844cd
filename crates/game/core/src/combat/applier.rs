//! Damage receivers.

use std::collections::BTreeMap;

use crate::config::SkillConfig;
use crate::events::{EventQueue, SimEvent};
use crate::skill::StatusHook;
use crate::stats::{StatVector, Vitals};
use crate::types::EntityId;

use super::damage::mitigate;

/// Receiver side of a resolved hit.
///
/// Both entry points notify observers through `events` after mutating the
/// target and return the HP actually removed. Unknown targets are ignored
/// and report `None`.
pub trait DamageSink {
    /// Defeated targets no longer take hits or consume volumes.
    fn is_defeated(&self, _target: EntityId) -> bool {
        false
    }


    /// Applies `raw` after the target's own defense mitigation.
    fn apply_incoming_raw(
        &mut self,
        target: EntityId,
        source: EntityId,
        raw: f32,
        events: &mut EventQueue,
    ) -> Option<f32>;

    /// Applies `amount` as-is, bypassing mitigation.
    fn apply_final_damage(
        &mut self,
        target: EntityId,
        source: EntityId,
        amount: f32,
        events: &mut EventQueue,
    ) -> Option<f32>;
}

/// Vitals and mitigation of one combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectApplier {
    pub id: EntityId,
    pub display_name: String,
    pub vitals: Vitals,
    /// Defense total used for mitigation.
    pub defense: f32,
}

impl EffectApplier {
    pub fn new(id: EntityId, display_name: impl Into<String>, vitals: Vitals, stats: &StatVector) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            vitals,
            defense: stats.defense_total(),
        }
    }

    /// Returns the damage actually removed from HP.
    fn take(&mut self, amount: f32) -> f32 {
        let before = self.vitals.hp.current();
        self.vitals.hp.add(-amount.max(0.0));
        before - self.vitals.hp.current()
    }

    pub fn vitals_event(&self) -> SimEvent {
        SimEvent::VitalsChanged {
            target: self.id,
            display_name: self.display_name.clone(),
            hp: self.vitals.hp.current(),
            max_hp: self.vitals.hp.max(),
            mp: self.vitals.mp.current(),
            max_mp: self.vitals.mp.max(),
        }
    }
}

/// Registry of every damageable entity, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Combatants {
    appliers: BTreeMap<EntityId, EffectApplier>,
    defense_k: f32,
}

impl Combatants {
    pub fn new(config: &SkillConfig) -> Self {
        Self {
            appliers: BTreeMap::new(),
            defense_k: config.defense_k,
        }
    }

    pub fn insert(&mut self, applier: EffectApplier) -> Option<EffectApplier> {
        self.appliers.insert(applier.id, applier)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<EffectApplier> {
        self.appliers.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EffectApplier> {
        self.appliers.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EffectApplier> {
        self.appliers.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectApplier> {
        self.appliers.values()
    }

    /// Pushes a `VitalsChanged` for `id`, e.g. after mana was spent.
    pub fn notify_vitals(&self, id: EntityId, events: &mut EventQueue) {
        if let Some(applier) = self.appliers.get(&id) {
            events.push(applier.vitals_event());
        }
    }

    fn deal(
        &mut self,
        target: EntityId,
        source: EntityId,
        amount: f32,
        events: &mut EventQueue,
    ) -> Option<f32> {
        let Some(applier) = self.appliers.get_mut(&target) else {
            tracing::debug!(%target, %source, "damage dropped: unknown target");
            return None;
        };

        let dealt = applier.take(amount);
        tracing::debug!(
            %target,
            %source,
            mitigated = amount,
            dealt,
            hp = applier.vitals.hp.current(),
            "damage applied"
        );

        events.push(SimEvent::DamageApplied {
            target,
            source,
            amount: dealt,
            remaining_hp: applier.vitals.hp.current(),
        });
        events.push(applier.vitals_event());
        Some(dealt)
    }
}

impl DamageSink for Combatants {
    fn is_defeated(&self, target: EntityId) -> bool {
        self.appliers
            .get(&target)
            .is_some_and(|applier| !applier.vitals.is_alive())
    }

    fn apply_incoming_raw(
        &mut self,
        target: EntityId,
        source: EntityId,
        raw: f32,
        events: &mut EventQueue,
    ) -> Option<f32> {
        let defense = self.appliers.get(&target)?.defense;
        let amount = mitigate(raw, defense, self.defense_k);
        self.deal(target, source, amount, events)
    }

    fn apply_final_damage(
        &mut self,
        target: EntityId,
        source: EntityId,
        amount: f32,
        events: &mut EventQueue,
    ) -> Option<f32> {
        self.deal(target, source, amount.max(0.0), events)
    }
}

/// Lands one hit: mitigated damage followed by the skill's status hooks.
/// Hooks only fire when the target actually received the hit.
pub fn strike(
    sink: &mut dyn DamageSink,
    target: EntityId,
    source: EntityId,
    raw: f32,
    hooks: &[StatusHook],
    events: &mut EventQueue,
) -> Option<f32> {
    let dealt = sink.apply_incoming_raw(target, source, raw, events)?;
    for hook in hooks {
        events.push(SimEvent::StatusHookTriggered {
            target,
            source,
            hook: hook.clone(),
        });
    }
    Some(dealt)
}
