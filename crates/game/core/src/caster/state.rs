//! Cast state machine.
//!
//! ```text
//! Idle ──try_cast──▶ Casting{remaining} ──tick…──▶ Recovering{remaining} ──tick…──▶ Idle
//!                                        └─(no recovery)──────────────────────────▶ Idle
//! ```
//!
//! Only `tick` moves the machine forward; disabling the caster or freezing
//! time holds it in place.

use std::sync::Arc;

use crate::collision::CollisionMask;
use crate::skill::{ComputedSkill, SkillDefinition, SkillId};
use crate::types::EntityId;

/// A cast whose gates passed and whose cast time is counting down.
#[derive(Clone, Debug)]
pub struct PendingCast {
    pub skill: Arc<SkillDefinition>,
    pub computed: ComputedSkill,
    pub group: usize,
    pub index: usize,
    pub slot: usize,
    pub remaining: f32,
}

#[derive(Clone, Debug, Default)]
pub enum CastState {
    #[default]
    Idle,
    Casting(PendingCast),
    /// Post-cast lockout before the next cast may start.
    Recovering { remaining: f32 },
}

impl CastState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_casting(&self) -> bool {
        matches!(self, Self::Casting(_))
    }

    pub fn pending(&self) -> Option<&PendingCast> {
        match self {
            Self::Casting(pending) => Some(pending),
            _ => None,
        }
    }
}

/// Returned by a successful `try_cast_slot`.
#[derive(Clone, Debug, PartialEq)]
pub struct CastStart {
    pub skill: SkillId,
    pub slot: usize,
    pub cast_time: f32,
    pub cooldown: f32,
    pub mp_cost: f32,
}

/// A cast whose countdown finished; ready to be resolved against the world.
#[derive(Clone, Debug)]
pub struct CastDispatch {
    pub caster: EntityId,
    pub caster_mask: CollisionMask,
    pub skill: Arc<SkillDefinition>,
    pub computed: ComputedSkill,
    pub slot: usize,
}
