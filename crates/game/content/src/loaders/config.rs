//! Formula constant loader.

use std::path::Path;

use skill_core::SkillConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SkillConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their built-in defaults.
    pub fn load(path: &Path) -> LoadResult<SkillConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<SkillConfig> {
        let config: SkillConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }

    /// The embedded `data/config.toml`.
    pub fn builtin() -> LoadResult<SkillConfig> {
        Self::parse(include_str!("../../data/config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_defaults() {
        assert_eq!(ConfigLoader::builtin().unwrap(), SkillConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("defense_k = 50.0").unwrap();
        assert_eq!(config.defense_k, 50.0);
        assert_eq!(config.k_tech, SkillConfig::DEFAULT_K_TECH);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ConfigLoader::parse("atk_a = \"lots\"").is_err());
    }
}
