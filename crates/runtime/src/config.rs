//! Harness configuration sourced from the process environment.
use std::env;
use std::path::PathBuf;

use skill_content::{ConfigLoader, LoadedCatalog, SkillLoader};
use skill_core::SkillConfig;

/// Settings for a fixed-step simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Simulated frames per second; the fixed step is `1 / fps`.
    pub fps: u32,
    /// Simulated duration of a run.
    pub seconds: f32,
    /// Reuse released hit-volumes per template.
    pub pooling: bool,
    /// TOML file with formula constants; built-ins when unset.
    pub config_path: Option<PathBuf>,
    /// RON skill catalog; built-ins when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            seconds: 6.0,
            pooling: true,
            config_path: None,
            catalog_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SKILL_SIM_FPS`
    /// - `SKILL_SIM_SECONDS`
    /// - `SKILL_SIM_POOLING` (`true` / `false`)
    /// - `SKILL_SIM_CONFIG` / `SKILL_SIM_CATALOG` (file paths)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(fps) = read_env::<u32>("SKILL_SIM_FPS") {
            config.fps = fps.max(1);
        }

        if let Some(seconds) = read_env::<f32>("SKILL_SIM_SECONDS") {
            config.seconds = seconds.max(0.0);
        }

        if let Some(pooling) = read_env::<bool>("SKILL_SIM_POOLING") {
            config.pooling = pooling;
        }

        config.config_path = read_env::<PathBuf>("SKILL_SIM_CONFIG");
        config.catalog_path = read_env::<PathBuf>("SKILL_SIM_CATALOG");

        config
    }

    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Number of fixed steps covering `seconds`.
    pub fn frame_count(&self) -> u64 {
        (self.seconds.max(0.0) * self.fps.max(1) as f32).ceil() as u64
    }

    pub fn load_skill_config(&self) -> anyhow::Result<SkillConfig> {
        match &self.config_path {
            Some(path) => ConfigLoader::load(path),
            None => ConfigLoader::builtin(),
        }
    }

    pub fn load_catalog(&self) -> anyhow::Result<LoadedCatalog> {
        match &self.catalog_path {
            Some(path) => SkillLoader::load(path),
            None => SkillLoader::builtin(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
