//! Defense system - Armor, Shields, Level scaling

mod armour;
pub mod scaling;
mod shield;

pub use armour::{
    armor_mitigation, armor_needed_for_mitigation, armor_reduction_factor,
    calculate_armor_reduction,
};
pub use shield::{ShieldAbsorb, ShieldState};

use serde::{Deserialize, Serialize};

/// Authored inputs for a combatant's defenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantProfile {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub is_player: bool,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub base_armor: f64,
    #[serde(default)]
    pub base_shield: f64,
}

fn default_level() -> u32 {
    1
}

impl Default for CombatantProfile {
    fn default() -> Self {
        CombatantProfile {
            level: default_level(),
            is_player: false,
            faction: None,
            base_armor: 0.0,
            base_shield: 0.0,
        }
    }
}

/// Cached defensive attributes, recomputed on spawn or level/faction change
///
/// The damage pipeline only reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensiveAttributes {
    pub level: u32,
    pub is_player: bool,
    /// Lower-cased faction name
    pub faction: Option<String>,
    pub armor: f64,
    pub max_shield: f64,
    /// Shield regenerated per second
    pub regen_rate: f64,
    pub regen_delay_ticks: u32,
    pub depleted_regen_delay_ticks: u32,
    pub immunity_ticks: u32,
}

impl DefensiveAttributes {
    /// Apply level scaling to a profile
    pub fn derive(profile: &CombatantProfile) -> Self {
        let level = profile.level.max(1);
        let armor = scaling::scaled_armor(profile.base_armor, level);
        let max_shield =
            profile.base_shield.max(0.0) * scaling::shield_coefficient(level, profile.is_player);
        let (regen_delay_ticks, depleted_regen_delay_ticks) =
            scaling::regen_delay_ticks(profile.is_player);

        DefensiveAttributes {
            level,
            is_player: profile.is_player,
            faction: profile.faction.as_ref().map(|f| f.to_ascii_lowercase()),
            armor,
            max_shield,
            regen_rate: scaling::regen_rate(max_shield),
            regen_delay_ticks,
            depleted_regen_delay_ticks,
            immunity_ticks: scaling::immunity_ticks(max_shield),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_low_level_enemy() {
        let attrs = DefensiveAttributes::derive(&CombatantProfile {
            level: 10,
            is_player: false,
            faction: Some("Grineer".to_string()),
            base_armor: 500.0,
            base_shield: 100.0,
        });

        assert!((attrs.armor - 500.0).abs() < f64::EPSILON);
        assert!((attrs.max_shield - 100.0).abs() < f64::EPSILON);
        assert!((attrs.regen_rate - 20.0).abs() < f64::EPSILON);
        assert_eq!(attrs.faction.as_deref(), Some("grineer"));
        assert_eq!(attrs.regen_delay_ticks, 60);
        assert_eq!(attrs.depleted_regen_delay_ticks, 60);
    }

    #[test]
    fn test_derive_scales_with_level() {
        let profile = CombatantProfile {
            level: 36,
            base_armor: 100.0,
            base_shield: 100.0,
            ..Default::default()
        };
        let attrs = DefensiveAttributes::derive(&profile);
        assert!((attrs.armor - 420.0).abs() < 1e-9);
        assert!(attrs.max_shield > 100.0);
    }

    #[test]
    fn test_player_shield_does_not_scale() {
        let attrs = DefensiveAttributes::derive(&CombatantProfile {
            level: 80,
            is_player: true,
            faction: None,
            base_armor: 0.0,
            base_shield: 300.0,
        });
        assert!((attrs.max_shield - 300.0).abs() < f64::EPSILON);
        assert_eq!(attrs.regen_delay_ticks, 40);
        assert_eq!(attrs.depleted_regen_delay_ticks, 120);
    }

    #[test]
    fn test_level_zero_treated_as_one() {
        let attrs = DefensiveAttributes::derive(&CombatantProfile {
            level: 0,
            ..Default::default()
        });
        assert_eq!(attrs.level, 1);
        assert!((attrs.armor - 0.0).abs() < f64::EPSILON);
    }
}
