//! Armor - damage reduction on a square-root curve

use crate::config::ArmorConstants;

/// Armor mitigation: `factor * sqrt(armor / cap)`
///
/// With the default constants 2700 armor mitigates 90%.
pub fn armor_mitigation(armor: f64, constants: &ArmorConstants) -> f64 {
    if armor <= 0.0 || constants.cap <= 0.0 {
        return 0.0;
    }
    constants.mitigation_factor * (armor / constants.cap).sqrt()
}

/// Multiplier applied to incoming damage, in [0, 1]
///
/// # Arguments
/// * `armor` - The defender's effective armor
///
/// # Returns
/// `max(0, 1 - mitigation)`
pub fn armor_reduction_factor(armor: f64, constants: &ArmorConstants) -> f64 {
    (1.0 - armor_mitigation(armor, constants)).clamp(0.0, 1.0)
}

/// Damage left after armor
pub fn calculate_armor_reduction(armor: f64, damage: f64, constants: &ArmorConstants) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    damage * armor_reduction_factor(armor, constants)
}

/// Armor needed to reach a mitigation percentage
pub fn armor_needed_for_mitigation(target_percent: f64, constants: &ArmorConstants) -> f64 {
    if target_percent <= 0.0 {
        return 0.0;
    }
    // Past 100% the reduction factor is already clamped at 0
    let ratio = target_percent.min(100.0) / 100.0 / constants.mitigation_factor;
    ratio * ratio * constants.cap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> ArmorConstants {
        ArmorConstants::default()
    }

    #[test]
    fn test_no_armor() {
        assert!((armor_reduction_factor(0.0, &constants()) - 1.0).abs() < f64::EPSILON);
        assert!((calculate_armor_reduction(0.0, 100.0, &constants()) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_armor_at_cap() {
        let factor = armor_reduction_factor(2700.0, &constants());
        assert!((factor - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_cap() {
        // sqrt(675 / 2700) = 0.5, AM = 0.45
        let factor = armor_reduction_factor(675.0, &constants());
        assert!((factor - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_huge_armor_clamps_to_zero() {
        assert!((armor_reduction_factor(1.0e6, &constants()) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_armor_is_no_armor() {
        assert!((armor_reduction_factor(-50.0, &constants()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_damage() {
        assert!((calculate_armor_reduction(1000.0, 0.0, &constants()) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_armor_needed() {
        let needed = armor_needed_for_mitigation(45.0, &constants());
        assert!((needed - 675.0).abs() < 1e-6);

        let mitigation = armor_mitigation(needed, &constants());
        assert!((mitigation - 0.45).abs() < 1e-9);
    }
}
