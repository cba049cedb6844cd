//! Defense mitigation.

/// Mitigate incoming raw damage by a defense total.
///
/// # Formula
///
/// ```text
/// final = max(0, raw) · K / (K + max(0, defense))
/// ```
///
/// A non-positive denominator (misconfigured `K`) passes the damage through.
pub fn mitigate(raw: f32, defense_total: f32, defense_k: f32) -> f32 {
    let raw = raw.max(0.0);
    let denom = defense_k + defense_total.max(0.0);
    if denom <= 0.0 {
        return raw;
    }
    raw * defense_k / denom
}
