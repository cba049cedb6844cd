//! Skill definitions, thresholds and formula resolution.
//!
//! - [`SkillDefinition`]: authored data, shared by `Arc`
//! - [`Requirements`]: learn/cast gates
//! - [`SkillCalculator`]: `(definition, stats) → ComputedSkill`
//! - [`SkillLibrary`]: catalog of definitions and hit-volume templates

pub mod calculator;
pub mod definition;
pub mod library;
pub mod requirements;

pub use calculator::{ComputedSkill, SkillCalculator};
pub use definition::{HitType, SkillDefinition, SkillId, SkillType, StatusHook, TargetType};
pub use library::{LibraryError, SkillLibrary};
pub use requirements::{Bound, RequirementFailure, Requirements, StatRange};
