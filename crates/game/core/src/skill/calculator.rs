//! Stat → number resolution.
//!
//! # Formulas
//!
//! ```text
//! damage      = max(0, base_damage + Attack · atk_a)
//! curve_tech  = 0.5 + 0.5 · e^(−k_tech · Technique)
//! cooldown    = base_cooldown · curve_tech
//! mp_cost     = max(0, base_mp_cost · curve_tech)
//! area_radius = base_area_radius · (0.1 + 0.9 · e^(−k_agi · Agility))
//! ```
//!
//! Stats are totals (raw + base). Outputs are deterministic and never fail;
//! extreme stats produce extreme but defined numbers.

use crate::config::SkillConfig;
use crate::stats::StatVector;

use super::definition::SkillDefinition;

/// Numbers actually used by one cast. Produced per attempt, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedSkill {
    pub damage: f32,
    pub cooldown: f32,
    pub mp_cost: f32,
    pub area_radius: f32,
    /// Degrees.
    pub cone_angle: f32,
    pub cast_time: f32,
    pub recovery_time: f32,
    pub range: f32,
}

/// Formula resolver parameterised by [`SkillConfig`].
#[derive(Clone, Debug, Default)]
pub struct SkillCalculator {
    config: SkillConfig,
}

impl SkillCalculator {
    pub fn new(config: SkillConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub fn compute(&self, definition: &SkillDefinition, stats: &StatVector) -> ComputedSkill {
        let tech = self.technique_curve(stats.technique_total());

        ComputedSkill {
            damage: (definition.base_damage + stats.attack_total() * self.config.atk_a).max(0.0),
            cooldown: (definition.base_cooldown * tech).max(0.0),
            mp_cost: (definition.base_mp_cost * tech).max(0.0),
            area_radius: (definition.base_area_radius
                * self.agility_curve(stats.agility_total()))
            .max(0.0),
            cone_angle: definition.base_cone_angle.max(0.0),
            cast_time: definition.cast_time.max(0.0),
            recovery_time: definition.recovery_time.max(0.0),
            range: definition.range.max(0.0),
        }
    }

    /// Multiplier in `(0.5, 1]`; halves asymptotically as Technique grows.
    pub fn technique_curve(&self, technique: f32) -> f32 {
        0.5 + 0.5 * (-self.config.k_tech * technique).exp()
    }

    /// Multiplier in `(0.1, 1]`; shrinks toward 10% as Agility grows.
    pub fn agility_curve(&self, agility: f32) -> f32 {
        0.1 + 0.9 * (-self.config.k_agi * agility).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::SkillType;
    use crate::stats::{BASE_STAT, StatKind};

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    fn strike() -> SkillDefinition {
        let mut def = SkillDefinition::new("Strike", SkillType::Normal, 1, 1);
        def.base_damage = 100.0;
        def.base_cooldown = 5.0;
        def.base_mp_cost = 20.0;
        def.base_area_radius = 4.0;
        def.base_cone_angle = 90.0;
        def.cast_time = 0.4;
        def
    }

    #[test]
    fn reference_scenario_numbers() {
        // Attack total 40, Technique total 90.
        let stats = StatVector::default()
            .with(StatKind::Attack, 40.0 - BASE_STAT)
            .with(StatKind::Technique, 90.0 - BASE_STAT);
        let computed = SkillCalculator::default().compute(&strike(), &stats);

        assert!(approx(computed.damage, 140.0, 1e-4));
        assert!(approx(computed.cooldown, 3.75, 1e-3), "{}", computed.cooldown);
        assert!(approx(computed.mp_cost, 15.0, 1e-2));
        assert_eq!(computed.cast_time, 0.4);
        assert_eq!(computed.cone_angle, 90.0);
    }

    #[test]
    fn damage_never_negative() {
        let mut def = strike();
        def.base_damage = -500.0;
        let computed = SkillCalculator::default().compute(&def, &StatVector::default());
        assert_eq!(computed.damage, 0.0);
    }

    #[test]
    fn curves_approach_their_floors() {
        let calc = SkillCalculator::default();
        assert!(calc.technique_curve(10_000.0) > 0.5);
        assert!(approx(calc.technique_curve(10_000.0), 0.5, 1e-4));
        assert!(approx(calc.agility_curve(10_000.0), 0.1, 1e-4));
        assert!(approx(calc.agility_curve(0.0), 1.0, 1e-6));
    }

    #[test]
    fn agility_tightens_area_radius() {
        let calc = SkillCalculator::default();
        let slow = StatVector::default();
        let fast = StatVector::default().with(StatKind::Agility, 90.0);

        let wide = calc.compute(&strike(), &slow).area_radius;
        let tight = calc.compute(&strike(), &fast).area_radius;
        assert!(tight < wide);
    }
}
