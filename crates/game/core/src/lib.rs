//! Deterministic skill execution and hit-volume simulation.
//!
//! `skill-core` turns a [`SkillDefinition`] and a caster's live stats into
//! cooldowns, mana costs and a timed cast, then simulates the hit-volumes the
//! cast spawns and decides who gets hit and for how much. Everything here is
//! pure and frame-synchronous: a host calls [`SkillCaster::tick`] and
//! [`HitVolumeArena::tick`] once per frame and drains the [`EventQueue`].
//!
//! Gameplay geometry is evaluated in logical (undistorted) space; positions
//! are stored in visual space, whose vertical axis is compressed by
//! [`perspective::VERTICAL_SCALE`].
pub mod caster;
pub mod collision;
pub mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod hitvolume;
pub mod perspective;
pub mod skill;
pub mod stats;
pub mod types;

pub use caster::{
    CastDispatch, CastError, CastStart, CastState, CasterRefs, CooldownBank, DispatchEnv,
    DispatchOutcome, GroupError, SkillCaster, SkillGroup, SlotView,
};
pub use collision::{Collider, ColliderQuery, ColliderSet, CollisionMask, InteractionLayer};
pub use combat::{Combatants, DamageSink, EffectApplier, mitigate, strike};
pub use config::SkillConfig;
pub use error::{ErrorSeverity, GameError};
pub use events::{EventQueue, SimEvent};
pub use hitvolume::{
    HitContext, HitVolume, HitVolumeArena, HitVolumeHandle, HitVolumeTemplate, Motion, MotionKind,
    Spin, TerminationReason, VolumePhase, VolumeSpawn,
};
pub use skill::{
    ComputedSkill, HitType, LibraryError, Requirements, SkillCalculator, SkillDefinition, SkillId,
    SkillLibrary, SkillType, StatRange, StatusHook, TargetType,
};
pub use stats::{
    AllocationError, BASE_STAT, ResourceMeter, StatKind, StatSheet, StatVector, Vitals,
};
pub use types::{EntityId, TemplateId};
