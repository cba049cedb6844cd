use std::sync::Arc;

use crate::skill::SkillDefinition;

use super::cooldown::CooldownBank;

/// A named, independently cooled list of skills.
///
/// The cooldown bank is private so its length can only change together with
/// the skill list.
#[derive(Clone, Debug)]
pub struct SkillGroup {
    pub name: String,
    skills: Vec<Option<Arc<SkillDefinition>>>,
    cooldowns: CooldownBank,
}

impl SkillGroup {
    pub fn new(name: impl Into<String>, skills: Vec<Option<Arc<SkillDefinition>>>) -> Self {
        let cooldowns = CooldownBank::new(skills.len());
        Self {
            name: name.into(),
            skills,
            cooldowns,
        }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// `None` for both an out-of-range index and an empty position.
    pub fn skill(&self, index: usize) -> Option<&Arc<SkillDefinition>> {
        self.skills.get(index).and_then(Option::as_ref)
    }

    pub fn skills(&self) -> &[Option<Arc<SkillDefinition>>] {
        &self.skills
    }

    pub fn cooldowns(&self) -> &CooldownBank {
        &self.cooldowns
    }

    pub(super) fn cooldowns_mut(&mut self) -> &mut CooldownBank {
        &mut self.cooldowns
    }

    /// Replaces the whole list; every timer is cleared.
    pub(super) fn replace_skills(&mut self, skills: Vec<Option<Arc<SkillDefinition>>>) {
        self.cooldowns.reset(skills.len());
        self.skills = skills;
    }

    /// Replaces one position, growing the list if needed. The affected timer
    /// is cleared; growth clears the whole bank.
    pub(super) fn put(&mut self, index: usize, skill: Option<Arc<SkillDefinition>>) {
        if index >= self.skills.len() {
            self.skills.resize(index + 1, None);
            self.cooldowns.reset(self.skills.len());
        } else {
            self.cooldowns.clear(index);
        }
        self.skills[index] = skill;
    }
}
