use crate::error::{ErrorSeverity, GameError};
use crate::skill::{RequirementFailure, SkillId};

/// Why `try_cast_slot` refused to start a cast.
///
/// Returning any of these leaves the caster, its cooldowns and the mana pool
/// untouched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("caster is disabled")]
    Disabled,

    #[error("a cast is already in flight")]
    AlreadyCasting,

    #[error("caster has no stat or mana reference")]
    MissingReferences,

    #[error("no active skill group")]
    NoActiveGroup,

    #[error("slot {slot} does not exist")]
    SlotOutOfRange { slot: usize },

    #[error("slot {slot} is not bound")]
    SlotUnbound { slot: usize },

    #[error("skill index {index} is outside a group of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("group position {index} holds no skill")]
    EmptySlot { index: usize },

    #[error("{0} is passive and cannot be cast")]
    PassiveSkill(SkillId),

    #[error("cast requirement not met: {0}")]
    RequirementNotMet(RequirementFailure),

    #[error("on cooldown for {remaining:.2}s")]
    OnCooldown { remaining: f32 },

    #[error("insufficient mana: need {required:.1}, have {available:.1}")]
    InsufficientMana { required: f32, available: f32 },
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Disabled
            | Self::AlreadyCasting
            | Self::OnCooldown { .. }
            | Self::InsufficientMana { .. }
            | Self::RequirementNotMet(_) => ErrorSeverity::Recoverable,
            Self::SlotOutOfRange { .. }
            | Self::SlotUnbound { .. }
            | Self::IndexOutOfRange { .. }
            | Self::EmptySlot { .. }
            | Self::PassiveSkill(_) => ErrorSeverity::Validation,
            Self::MissingReferences | Self::NoActiveGroup => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Disabled => "CAST_DISABLED",
            Self::AlreadyCasting => "CAST_ALREADY_CASTING",
            Self::MissingReferences => "CAST_MISSING_REFERENCES",
            Self::NoActiveGroup => "CAST_NO_ACTIVE_GROUP",
            Self::SlotOutOfRange { .. } => "CAST_SLOT_OUT_OF_RANGE",
            Self::SlotUnbound { .. } => "CAST_SLOT_UNBOUND",
            Self::IndexOutOfRange { .. } => "CAST_INDEX_OUT_OF_RANGE",
            Self::EmptySlot { .. } => "CAST_EMPTY_SLOT",
            Self::PassiveSkill(_) => "CAST_PASSIVE_SKILL",
            Self::RequirementNotMet(_) => "CAST_REQUIREMENT_NOT_MET",
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::InsufficientMana { .. } => "CAST_INSUFFICIENT_MANA",
        }
    }
}

/// Errors raised by skill-group management.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GroupError {
    #[error("group {index} does not exist ({count} groups)")]
    GroupOutOfRange { index: usize, count: usize },

    #[error("slot {slot} does not exist")]
    SlotOutOfRange { slot: usize },

    #[error("cannot remove the last skill group")]
    LastGroup,

    #[error("learn requirement not met: {0}")]
    RequirementNotMet(RequirementFailure),
}

impl GameError for GroupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RequirementNotMet(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GroupOutOfRange { .. } => "GROUP_OUT_OF_RANGE",
            Self::SlotOutOfRange { .. } => "GROUP_SLOT_OUT_OF_RANGE",
            Self::LastGroup => "GROUP_LAST_GROUP",
            Self::RequirementNotMet(_) => "GROUP_REQUIREMENT_NOT_MET",
        }
    }
}
