//! Skill catalog loader.
//!
//! A catalog bundles hit-volume templates, skill definitions and the default
//! skill groups a caster starts with. Skill ids are derived from each
//! definition's type, rank and family serial; catalogs never spell them out
//! except when listing group members.

use std::path::Path;
use std::sync::Arc;

use skill_core::{HitVolumeTemplate, SkillDefinition, SkillLibrary};

use crate::loaders::{LoadResult, read_file};

/// Raw catalog file contents.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SkillCatalog {
    pub templates: Vec<HitVolumeTemplate>,
    pub skills: Vec<SkillDefinition>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// A named group and its ordered skill ids; `None` marks an empty entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<Option<String>>,
}

/// A validated catalog: every template reference and group member resolves.
#[derive(Clone, Debug)]
pub struct LoadedCatalog {
    pub library: SkillLibrary,
    pub groups: Vec<GroupSpec>,
}

impl LoadedCatalog {
    /// Build the library from raw catalog data.
    pub fn build(catalog: SkillCatalog) -> LoadResult<Self> {
        let mut library = SkillLibrary::new();

        for template in catalog.templates {
            library
                .insert_template(template)
                .map_err(|e| anyhow::anyhow!("Invalid template: {}", e))?;
        }
        for definition in catalog.skills {
            library
                .insert_skill(definition)
                .map_err(|e| anyhow::anyhow!("Invalid skill: {}", e))?;
        }
        library
            .validate()
            .map_err(|e| anyhow::anyhow!("Catalog validation failed: {}", e))?;

        for group in &catalog.groups {
            for id in group.skills.iter().flatten() {
                if library.skill(id).is_none() {
                    return Err(anyhow::anyhow!(
                        "Group '{}' references unknown skill {}",
                        group.name,
                        id
                    ));
                }
            }
        }

        tracing::debug!(
            skills = library.skill_count(),
            templates = library.template_count(),
            groups = catalog.groups.len(),
            "skill catalog loaded"
        );

        Ok(Self {
            library,
            groups: catalog.groups,
        })
    }

    /// Resolve a group's entries against the library.
    ///
    /// Returns `None` if no group carries that name.
    pub fn resolve_group(&self, name: &str) -> Option<Vec<Option<Arc<SkillDefinition>>>> {
        let group = self.groups.iter().find(|group| group.name == name)?;
        Some(
            group
                .skills
                .iter()
                .map(|entry| entry.as_deref().and_then(|id| self.library.skill(id)))
                .collect(),
        )
    }
}

/// Loader for skill catalogs from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load and validate a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<LoadedCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load catalog {}: {}", path.display(), e))
    }

    /// Parse and validate a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<LoadedCatalog> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        LoadedCatalog::build(catalog)
    }

    /// The embedded `data/skills.ron`.
    pub fn builtin() -> LoadResult<LoadedCatalog> {
        Self::parse(include_str!("../../data/skills.ron"))
    }
}
