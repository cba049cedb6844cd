//! Player intent sources.
//!
//! The driver polls an [`InputSource`] once per frame for each caster, so
//! the simulation runs the same with a keyboard, a replay, or a test script.
use std::collections::BTreeMap;

use glam::Vec2;

/// Per-frame intent for one caster.
pub trait InputSource {
    /// Called before any query for `frame`.
    fn begin_frame(&mut self, _frame: u64) {}

    /// Visual-space aim direction; need not be normalized.
    fn aim_direction(&self) -> Vec2;

    /// Was the cast input bound to `slot` pressed this frame?
    fn cast_pressed(&self, slot: usize) -> bool;

    /// Was the group-cycle input pressed this frame?
    fn switch_group_pressed(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptedAction {
    Cast(usize),
    SwitchGroup,
    Aim(Vec2),
}

/// Input replayed from a frame-indexed script.
///
/// Aim changes persist until the next `Aim`; presses last one frame.
#[derive(Clone, Debug)]
pub struct ScriptedInput {
    script: BTreeMap<u64, Vec<ScriptedAction>>,
    aim: Vec2,
    current: Vec<ScriptedAction>,
}

impl ScriptedInput {
    pub fn new(aim: Vec2) -> Self {
        Self {
            script: BTreeMap::new(),
            aim,
            current: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, frame: u64, action: ScriptedAction) -> Self {
        self.script.entry(frame).or_default().push(action);
        self
    }

    #[must_use]
    pub fn cast_at(self, frame: u64, slot: usize) -> Self {
        self.at(frame, ScriptedAction::Cast(slot))
    }

    #[must_use]
    pub fn switch_at(self, frame: u64) -> Self {
        self.at(frame, ScriptedAction::SwitchGroup)
    }

    #[must_use]
    pub fn aim_at(self, frame: u64, aim: Vec2) -> Self {
        self.at(frame, ScriptedAction::Aim(aim))
    }

    /// Frames with scripted actions still ahead of `frame`.
    pub fn remaining_after(&self, frame: u64) -> usize {
        self.script.range(frame + 1..).count()
    }
}

impl InputSource for ScriptedInput {
    fn begin_frame(&mut self, frame: u64) {
        self.current = self.script.get(&frame).cloned().unwrap_or_default();
        for action in &self.current {
            if let ScriptedAction::Aim(aim) = action {
                self.aim = *aim;
            }
        }
    }

    fn aim_direction(&self) -> Vec2 {
        self.aim
    }

    fn cast_pressed(&self, slot: usize) -> bool {
        self.current.contains(&ScriptedAction::Cast(slot))
    }

    fn switch_group_pressed(&self) -> bool {
        self.current.contains(&ScriptedAction::SwitchGroup)
    }
}
