//! Stat vector - the six allocatable attributes of a character.
//!
//! Total = Raw + BASE_STAT

use crate::error::{ErrorSeverity, GameError};

/// Fixed offset added to every raw stat to form its total.
pub const BASE_STAT: f32 = 10.0;

/// The six allocatable attributes.
///
/// - **Attack**: flat skill damage
/// - **Defense**: incoming damage mitigation
/// - **Agility**: tightens area radii
/// - **Technique**: shortens cooldowns and mana costs
/// - **HpStat** / **MpStat**: resource pools (consumed outside the core)
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Attack,
    Defense,
    Agility,
    Technique,
    HpStat,
    MpStat,
}

/// Raw stat points of a character.
///
/// Raw values are never negative by construction (allocation only adds), so
/// every total is at least [`BASE_STAT`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StatVector {
    pub attack: f32,
    pub defense: f32,
    pub agility: f32,
    pub technique: f32,
    pub hp_stat: f32,
    pub mp_stat: f32,
}

impl StatVector {
    /// Create a stat vector from raw points.
    pub const fn new(
        attack: f32,
        defense: f32,
        agility: f32,
        technique: f32,
        hp_stat: f32,
        mp_stat: f32,
    ) -> Self {
        Self {
            attack,
            defense,
            agility,
            technique,
            hp_stat,
            mp_stat,
        }
    }

    /// Builder-style setter for a single raw value.
    #[must_use]
    pub fn with(mut self, kind: StatKind, raw: f32) -> Self {
        *self.raw_mut(kind) = raw;
        self
    }

    /// Raw points for one attribute.
    pub fn raw(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Agility => self.agility,
            StatKind::Technique => self.technique,
            StatKind::HpStat => self.hp_stat,
            StatKind::MpStat => self.mp_stat,
        }
    }

    fn raw_mut(&mut self, kind: StatKind) -> &mut f32 {
        match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Agility => &mut self.agility,
            StatKind::Technique => &mut self.technique,
            StatKind::HpStat => &mut self.hp_stat,
            StatKind::MpStat => &mut self.mp_stat,
        }
    }

    /// Derived total (raw + [`BASE_STAT`]).
    #[inline]
    pub fn total(&self, kind: StatKind) -> f32 {
        self.raw(kind) + BASE_STAT
    }

    pub fn attack_total(&self) -> f32 {
        self.total(StatKind::Attack)
    }

    pub fn defense_total(&self) -> f32 {
        self.total(StatKind::Defense)
    }

    pub fn agility_total(&self) -> f32 {
        self.total(StatKind::Agility)
    }

    pub fn technique_total(&self) -> f32 {
        self.total(StatKind::Technique)
    }

    pub fn hp_total(&self) -> f32 {
        self.total(StatKind::HpStat)
    }

    pub fn mp_total(&self) -> f32 {
        self.total(StatKind::MpStat)
    }
}

/// Errors raised by stat-point allocation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("cannot allocate zero points")]
    ZeroPoints,

    #[error("not enough unspent points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },
}

impl GameError for AllocationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ZeroPoints => ErrorSeverity::Validation,
            Self::InsufficientPoints { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroPoints => "ALLOCATION_ZERO_POINTS",
            Self::InsufficientPoints { .. } => "ALLOCATION_INSUFFICIENT_POINTS",
        }
    }
}

/// A stat vector together with its pool of unspent points.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSheet {
    pub stats: StatVector,
    unspent_points: u32,
}

impl StatSheet {
    pub fn new(stats: StatVector, unspent_points: u32) -> Self {
        Self {
            stats,
            unspent_points,
        }
    }

    pub fn unspent_points(&self) -> u32 {
        self.unspent_points
    }

    /// Adds points to the unspent pool (level-up rewards and the like).
    pub fn grant_points(&mut self, points: u32) {
        self.unspent_points = self.unspent_points.saturating_add(points);
    }

    /// Moves unspent points into one attribute.
    pub fn allocate(&mut self, kind: StatKind, points: u32) -> Result<(), AllocationError> {
        if points == 0 {
            return Err(AllocationError::ZeroPoints);
        }
        if points > self.unspent_points {
            return Err(AllocationError::InsufficientPoints {
                requested: points,
                available: self.unspent_points,
            });
        }

        self.unspent_points -= points;
        *self.stats.raw_mut(kind) += points as f32;
        tracing::debug!(stat = %kind, points, remaining = self.unspent_points, "allocated stat points");
        Ok(())
    }
}
