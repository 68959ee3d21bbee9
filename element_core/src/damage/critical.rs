//! Critical tiers - chances above 100% guarantee tiers

use rand::Rng;

/// Critical tier parameters for a given chance
///
/// A chance of 150% always crits once and has a 50% chance of a second tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalRoll {
    /// Chance as a percentage
    pub chance_percent: f64,
    /// Tier reached on every hit
    pub guaranteed_tier: u32,
    /// Tier reached when the extra chance succeeds
    pub max_tier: u32,
    /// Percent chance of reaching `max_tier`
    pub extra_chance: f64,
}

impl CriticalRoll {
    /// Derive tiers from a chance expressed as a fraction (1.5 = 150%)
    pub fn from_chance(chance: f64) -> Self {
        let chance_percent = chance.max(0.0) * 100.0;
        let steps = ((chance_percent + 100.0) / 100.0).floor();
        let guaranteed = (steps - 1.0).max(0.0);
        let max = steps.max(0.0);

        CriticalRoll {
            chance_percent,
            guaranteed_tier: guaranteed as u32,
            max_tier: max as u32,
            extra_chance: chance_percent - guaranteed * 100.0,
        }
    }

    /// Tier for a draw in [0, 100)
    pub fn tier_for_draw(&self, draw: f64) -> u32 {
        if draw < self.extra_chance {
            self.max_tier
        } else {
            self.guaranteed_tier
        }
    }

    /// Draw once from `rng` and return the tier
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        self.tier_for_draw(rng.gen_range(0.0..100.0))
    }
}

/// `1 + tier * (critical_damage - 1)`
pub fn critical_multiplier(tier: u32, critical_damage: f64) -> f64 {
    1.0 + tier as f64 * (critical_damage - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_one_hundred_fifty_percent() {
        let roll = CriticalRoll::from_chance(1.5);
        assert_eq!(roll.guaranteed_tier, 1);
        assert_eq!(roll.max_tier, 2);
        assert!((roll.extra_chance - 50.0).abs() < 1e-9);

        assert_eq!(roll.tier_for_draw(40.0), 2);
        assert_eq!(roll.tier_for_draw(60.0), 1);
    }

    #[test]
    fn test_no_chance_never_crits() {
        let roll = CriticalRoll::from_chance(0.0);
        assert_eq!(roll.guaranteed_tier, 0);
        assert_eq!(roll.max_tier, 1);
        assert_eq!(roll.tier_for_draw(0.0), 0);
    }

    #[test]
    fn test_partial_chance() {
        let roll = CriticalRoll::from_chance(0.25);
        assert_eq!(roll.tier_for_draw(10.0), 1);
        assert_eq!(roll.tier_for_draw(25.0), 0);
    }

    #[test]
    fn test_exact_hundred_is_always_one() {
        let roll = CriticalRoll::from_chance(1.0);
        assert_eq!(roll.tier_for_draw(0.0), 1);
        assert_eq!(roll.tier_for_draw(99.9), 1);
    }

    #[test]
    fn test_roll_stays_in_range() {
        let roll = CriticalRoll::from_chance(2.3);
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..200 {
            let tier = roll.roll(&mut rng);
            assert!(tier == 2 || tier == 3);
        }
    }

    #[test]
    fn test_critical_multiplier() {
        assert!((critical_multiplier(0, 2.0) - 1.0).abs() < f64::EPSILON);
        assert!((critical_multiplier(2, 2.0) - 3.0).abs() < f64::EPSILON);
        assert!((critical_multiplier(3, 1.0) - 1.0).abs() < f64::EPSILON);
    }
}
