//! Stat thresholds gating learning and casting.
//!
//! Each of the six axes carries an independent optional minimum and optional
//! maximum, compared against stat totals. Learning checks both bounds; casting
//! only checks the minimums, so a caster who outgrows a cap keeps access to a
//! skill they already know.

use crate::stats::{StatKind, StatVector};

/// Optional bounds on one stat total.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StatRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl StatRange {
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    pub const fn at_least(min: f32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Which side of a [`StatRange`] was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Bound {
    Min,
    Max,
}

/// First threshold a stat vector failed.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("{stat} {actual} violates {bound} bound {required}")]
pub struct RequirementFailure {
    pub stat: StatKind,
    pub bound: Bound,
    pub required: f32,
    pub actual: f32,
}

/// Per-axis thresholds of a skill.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Requirements {
    pub attack: StatRange,
    pub defense: StatRange,
    pub agility: StatRange,
    pub technique: StatRange,
    pub hp_stat: StatRange,
    pub mp_stat: StatRange,
}

impl Requirements {
    /// No thresholds on any axis.
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: StatKind, range: StatRange) -> Self {
        *self.range_mut(kind) = range;
        self
    }

    pub fn range(&self, kind: StatKind) -> StatRange {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Agility => self.agility,
            StatKind::Technique => self.technique,
            StatKind::HpStat => self.hp_stat,
            StatKind::MpStat => self.mp_stat,
        }
    }

    fn range_mut(&mut self, kind: StatKind) -> &mut StatRange {
        match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Agility => &mut self.agility,
            StatKind::Technique => &mut self.technique,
            StatKind::HpStat => &mut self.hp_stat,
            StatKind::MpStat => &mut self.mp_stat,
        }
    }

    /// Learn-time gate: every minimum and every maximum.
    pub fn check_learn(&self, stats: &StatVector) -> Result<(), RequirementFailure> {
        self.check(stats, true)
    }

    /// Cast-time gate: minimums only.
    pub fn check_cast(&self, stats: &StatVector) -> Result<(), RequirementFailure> {
        self.check(stats, false)
    }

    fn check(&self, stats: &StatVector, with_caps: bool) -> Result<(), RequirementFailure> {
        use strum::IntoEnumIterator;

        for stat in StatKind::iter() {
            let range = self.range(stat);
            let actual = stats.total(stat);

            if let Some(required) = range.min
                && actual < required
            {
                return Err(RequirementFailure {
                    stat,
                    bound: Bound::Min,
                    required,
                    actual,
                });
            }

            if with_caps
                && let Some(required) = range.max
                && actual > required
            {
                return Err(RequirementFailure {
                    stat,
                    bound: Bound::Max,
                    required,
                    actual,
                });
            }
        }
        Ok(())
    }
}
