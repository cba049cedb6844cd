//! Outbound notifications.
//!
//! Everything observers care about is pushed into an [`EventQueue`] during a
//! tick and drained once afterwards, in the order it happened.

use crate::hitvolume::{HitVolumeHandle, MotionKind, TerminationReason};
use crate::skill::{HitType, SkillId, StatusHook};
use crate::types::{EntityId, TemplateId};

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// Gates passed, mana spent, cooldown armed.
    CastStarted {
        caster: EntityId,
        skill: SkillId,
        slot: usize,
        cast_time: f32,
        cooldown: f32,
        mp_cost: f32,
    },
    /// Cast time elapsed and the skill was dispatched.
    CastResolved {
        caster: EntityId,
        skill: SkillId,
        hit_type: HitType,
        /// Spawned volume, or `None` for an instantaneous query.
        volume: Option<HitVolumeHandle>,
        /// Targets damaged by an instantaneous query.
        hits: usize,
    },
    HitVolumeSpawned {
        handle: HitVolumeHandle,
        owner: EntityId,
        template: TemplateId,
        motion: MotionKind,
    },
    HitVolumeReleased {
        handle: HitVolumeHandle,
        owner: EntityId,
        template: TemplateId,
        reason: TerminationReason,
    },
    DamageApplied {
        target: EntityId,
        source: EntityId,
        amount: f32,
        remaining_hp: f32,
    },
    VitalsChanged {
        target: EntityId,
        display_name: String,
        hp: f32,
        max_hp: f32,
        mp: f32,
        max_mp: f32,
    },
    StatusHookTriggered {
        target: EntityId,
        source: EntityId,
        hook: StatusHook,
    },
}

/// Per-tick event buffer.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        tracing::trace!(?event, "event");
        self.events.push(event);
    }

    /// Removes and returns everything queued so far.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
