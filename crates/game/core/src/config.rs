/// Formula constants and tunable parameters for skill resolution.
///
/// Every field has a built-in default; tuning files only need to list the
/// values they override.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SkillConfig {
    /// Damage added per point of total Attack.
    pub atk_a: f32,
    /// Decay rate of the Technique curve (cooldown and mana cost).
    pub k_tech: f32,
    /// Decay rate of the Agility curve (area radius).
    pub k_agi: f32,
    /// Mitigation constant: `final = raw · K / (K + Defense)`.
    pub defense_k: f32,
}

impl SkillConfig {
    // ===== compile-time constants =====
    /// Number of input slots bound into the active skill group.
    pub const SLOT_COUNT: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATK_A: f32 = 1.0;
    pub const DEFAULT_K_TECH: f32 = 0.0077;
    pub const DEFAULT_K_AGI: f32 = 0.01;
    pub const DEFAULT_DEFENSE_K: f32 = 100.0;

    pub fn new() -> Self {
        Self {
            atk_a: Self::DEFAULT_ATK_A,
            k_tech: Self::DEFAULT_K_TECH,
            k_agi: Self::DEFAULT_K_AGI,
            defense_k: Self::DEFAULT_DEFENSE_K,
        }
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self::new()
    }
}
