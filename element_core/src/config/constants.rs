//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub armor: ArmorConstants,
    #[serde(default)]
    pub dot: DotConstants,
    #[serde(default)]
    pub blast: BlastConstants,
    #[serde(default)]
    pub gas: GasConstants,
    #[serde(default)]
    pub corrosive: CorrosiveConstants,
    #[serde(default)]
    pub heat: HeatConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorConstants {
    /// Armor value at which mitigation reaches `mitigation_factor`
    #[serde(default = "default_armor_cap")]
    pub cap: f64,
    /// Formula constant: mitigation = factor * sqrt(armor / cap)
    #[serde(default = "default_mitigation_factor")]
    pub mitigation_factor: f64,
}

impl Default for ArmorConstants {
    fn default() -> Self {
        ArmorConstants {
            cap: 2700.0,
            mitigation_factor: 0.9,
        }
    }
}

fn default_armor_cap() -> f64 {
    2700.0
}
fn default_mitigation_factor() -> f64 {
    0.9
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotConstants {
    /// Ticks between damage pulses
    pub interval_ticks: u32,
    pub duration_ticks: u32,
    /// Fraction of the hit damage dealt per bleed pulse, per level
    pub bleed_ratio: f64,
    /// Fraction of the hit damage dealt per poison pulse, per level
    pub poison_ratio: f64,
}

impl Default for DotConstants {
    fn default() -> Self {
        DotConstants {
            interval_ticks: 20,
            duration_ticks: 120,
            bleed_ratio: 0.35,
            poison_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastConstants {
    pub fuse_ticks: u32,
    pub lifetime_ticks: u32,
    /// Live entries per target; reaching it forces a burst
    pub max_level: u32,
    pub single_radius: f64,
    pub burst_radius: f64,
    /// Fraction of the hit damage each entry deals on detonation, per level
    pub damage_ratio: f64,
}

impl Default for BlastConstants {
    fn default() -> Self {
        BlastConstants {
            fuse_ticks: 30,
            lifetime_ticks: 120,
            max_level: 10,
            single_radius: 2.0,
            burst_radius: 5.0,
            damage_ratio: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConstants {
    pub lifetime_ticks: u32,
    /// Ticks during which the cloud applies damage; the rest is visual only
    pub active_ticks: u32,
    pub base_radius: f64,
    pub radius_per_level: f64,
    pub max_radius_bonus: f64,
    /// Fraction of the hit damage each cloud pulse deals, per level
    pub damage_ratio: f64,
}

impl Default for GasConstants {
    fn default() -> Self {
        GasConstants {
            lifetime_ticks: 120,
            active_ticks: 100,
            base_radius: 3.0,
            radius_per_level: 0.3,
            max_radius_bonus: 3.0,
            damage_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrosiveConstants {
    pub duration_ticks: u32,
    pub max_entries: usize,
    pub base_reduction: f64,
    pub reduction_per_level: f64,
    pub max_reduction: f64,
}

impl Default for CorrosiveConstants {
    fn default() -> Self {
        CorrosiveConstants {
            duration_ticks: 160,
            max_entries: 10,
            base_reduction: 0.26,
            reduction_per_level: 0.06,
            max_reduction: 0.80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConstants {
    pub duration_ticks: u32,
    /// Armor removed while burning (multiply-base)
    pub armor_reduction: f64,
}

impl Default for HeatConstants {
    fn default() -> Self {
        HeatConstants {
            duration_ticks: 120,
            armor_reduction: 0.5,
        }
    }
}
