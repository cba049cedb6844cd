//! Data-driven skill content.
//!
//! This crate houses the built-in skill catalog and tuning constants and
//! provides loaders for RON/TOML data files:
//! - Skill catalogs: hit-volume templates, skill definitions, default groups (RON)
//! - Formula constants (`SkillConfig`) (TOML)
//!
//! Content is consumed by the runtime and never mutated during a simulation.
//!
//! All loaders use skill-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, GroupSpec, LoadResult, LoadedCatalog, SkillCatalog, SkillLoader};
