use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ErrorSeverity, GameError};
use crate::hitvolume::HitVolumeTemplate;
use crate::types::TemplateId;

use super::definition::{SkillDefinition, SkillId};

/// Errors raised while assembling a [`SkillLibrary`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("duplicate skill id {0}")]
    DuplicateSkill(SkillId),

    #[error("duplicate hit-volume template {0}")]
    DuplicateTemplate(TemplateId),

    #[error("skill {skill} references unknown template {template}")]
    MissingTemplate { skill: SkillId, template: TemplateId },
}

impl GameError for LibraryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateSkill(_) => "LIBRARY_DUPLICATE_SKILL",
            Self::DuplicateTemplate(_) => "LIBRARY_DUPLICATE_TEMPLATE",
            Self::MissingTemplate { .. } => "LIBRARY_MISSING_TEMPLATE",
        }
    }
}

/// Catalog of shared skill definitions and hit-volume templates.
#[derive(Clone, Debug, Default)]
pub struct SkillLibrary {
    skills: BTreeMap<SkillId, Arc<SkillDefinition>>,
    templates: BTreeMap<TemplateId, HitVolumeTemplate>,
}

impl SkillLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_skill(
        &mut self,
        definition: SkillDefinition,
    ) -> Result<Arc<SkillDefinition>, LibraryError> {
        let id = definition.skill_id().clone();
        if self.skills.contains_key(&id) {
            return Err(LibraryError::DuplicateSkill(id));
        }
        let shared = Arc::new(definition);
        self.skills.insert(id, Arc::clone(&shared));
        Ok(shared)
    }

    pub fn insert_template(&mut self, template: HitVolumeTemplate) -> Result<(), LibraryError> {
        if self.templates.contains_key(&template.id) {
            return Err(LibraryError::DuplicateTemplate(template.id));
        }
        self.templates.insert(template.id, template);
        Ok(())
    }

    pub fn skill(&self, id: &str) -> Option<Arc<SkillDefinition>> {
        self.skills.get(id).cloned()
    }

    pub fn template(&self, id: TemplateId) -> Option<&HitVolumeTemplate> {
        self.templates.get(&id)
    }

    pub fn skills(&self) -> impl Iterator<Item = &Arc<SkillDefinition>> {
        self.skills.values()
    }

    pub fn templates(&self) -> impl Iterator<Item = &HitVolumeTemplate> {
        self.templates.values()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Every template reference must resolve.
    pub fn validate(&self) -> Result<(), LibraryError> {
        for definition in self.skills.values() {
            if let Some(template) = definition.template
                && !self.templates.contains_key(&template)
            {
                return Err(LibraryError::MissingTemplate {
                    skill: definition.skill_id().clone(),
                    template,
                });
            }
        }
        Ok(())
    }
}
