//! Content loaders for reading skill data from files.
//!
//! Every loader has a path-based `load` and a `builtin` variant backed by the
//! files under `data/`, embedded at compile time.

pub mod config;
pub mod skills;

pub use config::ConfigLoader;
pub use skills::{GroupSpec, LoadedCatalog, SkillCatalog, SkillLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
