//! Skill definitions.
//!
//! A [`SkillDefinition`] is the design-time description of one skill: its
//! identity, thresholds, base numbers and hit shape. Definitions are immutable
//! while a cast is in flight; the orchestrator holds them behind `Arc`.
//!
//! # Identity
//!
//! The string id is derived from `(kind, rank, family_serial)` and cached.
//! Those three fields are private so every write goes through a setter that
//! recomputes the id; deserialization recomputes it as well.

use std::borrow::Borrow;
use std::fmt;

use crate::collision::{CollisionMask, InteractionLayer};
use crate::types::TemplateId;

use super::requirements::Requirements;

/// Skill category; the first character of the derived id.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillType {
    #[default]
    Normal,
    Ultimate,
    Passive,
}

impl SkillType {
    pub const fn prefix(self) -> char {
        match self {
            Self::Normal => 'N',
            Self::Ultimate => 'U',
            Self::Passive => 'P',
        }
    }
}

/// Who a skill is allowed to affect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetType {
    #[default]
    Enemy,
    Ally,
    Any,
}

impl TargetType {
    /// Collision mask of valid targets for a caster classified as `caster_mask`.
    ///
    /// "Enemy" is whichever faction opposes the caster, so the same skill
    /// works for the player and for hostile casters.
    pub fn target_mask(self, caster_mask: CollisionMask) -> CollisionMask {
        let friendly = if caster_mask.contains(CollisionMask::ENEMY) {
            CollisionMask::ENEMY
        } else {
            CollisionMask::PLAYER | CollisionMask::ALLY
        };
        let hostile = if caster_mask.contains(CollisionMask::ENEMY) {
            CollisionMask::PLAYER | CollisionMask::ALLY
        } else {
            CollisionMask::ENEMY
        };

        match self {
            Self::Enemy => hostile,
            Self::Ally => friendly,
            Self::Any => hostile | friendly,
        }
    }
}

/// Hit shape used when the skill resolves.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HitType {
    #[default]
    Single,
    Area,
    Cone,
}

/// Status effect handed to observers when a skill lands.
///
/// The core does not run status effects; it reports them alongside damage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusHook {
    pub effect: String,
    pub duration: f32,
}

impl StatusHook {
    pub fn new(effect: impl Into<String>, duration: f32) -> Self {
        Self {
            effect: effect.into(),
            duration,
        }
    }
}

/// Derived skill identifier, e.g. `N03-0012`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SkillId(String);

impl SkillId {
    /// `"{N|U|P}{rank:02}-{serial:04}"`
    pub fn compose(kind: SkillType, rank: u8, family_serial: u16) -> Self {
        Self(format!("{}{:02}-{:04}", kind.prefix(), rank, family_serial))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SkillId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One skill as authored.
///
/// Angles are degrees, times are seconds, distances are logical units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "SkillDefinitionRecord", into = "SkillDefinitionRecord")
)]
pub struct SkillDefinition {
    kind: SkillType,
    rank: u8,
    family_serial: u16,
    skill_id: SkillId,

    pub name: String,
    pub requirements: Requirements,

    pub cast_time: f32,
    pub recovery_time: f32,
    pub base_cooldown: f32,
    pub base_mp_cost: f32,

    pub target_type: TargetType,
    pub hit_type: HitType,
    pub target_layer: InteractionLayer,

    pub base_damage: f32,
    pub range: f32,
    pub base_area_radius: f32,
    pub base_cone_angle: f32,

    /// Hit-volume spawned on dispatch; `None` resolves instantly.
    pub template: Option<TemplateId>,
    pub on_hit: Vec<StatusHook>,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>, kind: SkillType, rank: u8, family_serial: u16) -> Self {
        Self {
            kind,
            rank,
            family_serial,
            skill_id: SkillId::compose(kind, rank, family_serial),
            name: name.into(),
            requirements: Requirements::none(),
            cast_time: 0.0,
            recovery_time: 0.0,
            base_cooldown: 0.0,
            base_mp_cost: 0.0,
            target_type: TargetType::Enemy,
            hit_type: HitType::Single,
            target_layer: InteractionLayer::BODY,
            base_damage: 0.0,
            range: 0.0,
            base_area_radius: 0.0,
            base_cone_angle: 0.0,
            template: None,
            on_hit: Vec::new(),
        }
    }

    pub fn skill_id(&self) -> &SkillId {
        &self.skill_id
    }

    pub fn kind(&self) -> SkillType {
        self.kind
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn family_serial(&self) -> u16 {
        self.family_serial
    }

    pub fn set_kind(&mut self, kind: SkillType) {
        self.kind = kind;
        self.refresh_id();
    }

    pub fn set_rank(&mut self, rank: u8) {
        self.rank = rank;
        self.refresh_id();
    }

    pub fn set_family_serial(&mut self, family_serial: u16) {
        self.family_serial = family_serial;
        self.refresh_id();
    }

    pub fn is_passive(&self) -> bool {
        self.kind == SkillType::Passive
    }

    fn refresh_id(&mut self) {
        self.skill_id = SkillId::compose(self.kind, self.rank, self.family_serial);
    }
}

/// Serialized form of [`SkillDefinition`]; carries no id.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct SkillDefinitionRecord {
    kind: SkillType,
    rank: u8,
    family_serial: u16,
    name: String,
    #[serde(default)]
    requirements: Requirements,
    #[serde(default)]
    cast_time: f32,
    #[serde(default)]
    recovery_time: f32,
    #[serde(default)]
    base_cooldown: f32,
    #[serde(default)]
    base_mp_cost: f32,
    #[serde(default)]
    target_type: TargetType,
    #[serde(default)]
    hit_type: HitType,
    #[serde(default)]
    target_layer: InteractionLayer,
    #[serde(default)]
    base_damage: f32,
    #[serde(default)]
    range: f32,
    #[serde(default)]
    base_area_radius: f32,
    #[serde(default)]
    base_cone_angle: f32,
    #[serde(default)]
    template: Option<TemplateId>,
    #[serde(default)]
    on_hit: Vec<StatusHook>,
}

#[cfg(feature = "serde")]
impl From<SkillDefinitionRecord> for SkillDefinition {
    fn from(record: SkillDefinitionRecord) -> Self {
        let mut definition =
            SkillDefinition::new(record.name, record.kind, record.rank, record.family_serial);
        definition.requirements = record.requirements;
        definition.cast_time = record.cast_time;
        definition.recovery_time = record.recovery_time;
        definition.base_cooldown = record.base_cooldown;
        definition.base_mp_cost = record.base_mp_cost;
        definition.target_type = record.target_type;
        definition.hit_type = record.hit_type;
        definition.target_layer = record.target_layer;
        definition.base_damage = record.base_damage;
        definition.range = record.range;
        definition.base_area_radius = record.base_area_radius;
        definition.base_cone_angle = record.base_cone_angle;
        definition.template = record.template;
        definition.on_hit = record.on_hit;
        definition
    }
}

#[cfg(feature = "serde")]
impl From<SkillDefinition> for SkillDefinitionRecord {
    fn from(definition: SkillDefinition) -> Self {
        Self {
            kind: definition.kind,
            rank: definition.rank,
            family_serial: definition.family_serial,
            name: definition.name,
            requirements: definition.requirements,
            cast_time: definition.cast_time,
            recovery_time: definition.recovery_time,
            base_cooldown: definition.base_cooldown,
            base_mp_cost: definition.base_mp_cost,
            target_type: definition.target_type,
            hit_type: definition.hit_type,
            target_layer: definition.target_layer,
            base_damage: definition.base_damage,
            range: definition.range,
            base_area_radius: definition.base_area_radius,
            base_cone_angle: definition.base_cone_angle,
            template: definition.template,
            on_hit: definition.on_hit,
        }
    }
}
