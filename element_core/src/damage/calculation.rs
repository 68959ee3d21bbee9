//! Damage calculation - turning a Usage layer and target defenses into a final hit

use super::critical::{critical_multiplier, CriticalRoll};
use crate::config::ArmorConstants;
use crate::defense::armor_reduction_factor;
use crate::element::UsageLayer;
use crate::weapon::ExtraLayer;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Defender values read by the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitTarget {
    /// Effective armor after modifiers
    pub armor: f64,
    pub faction: Option<String>,
}

impl HitTarget {
    pub fn new(armor: f64, faction: Option<&str>) -> Self {
        HitTarget {
            armor,
            faction: faction.map(str::to_string),
        }
    }
}

/// Every intermediate value of one damage calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    pub base_damage: f64,
    pub element_multiplier: f64,
    pub physical_multiplier: f64,
    pub critical_tier: u32,
    pub critical_multiplier: f64,
    /// Additive faction bonus, applied as `1 + faction_modifier`
    pub faction_modifier: f64,
    /// Armor multiplier in [0, 1]
    pub armor_factor: f64,
    pub final_damage: f64,
}

impl DamageBreakdown {
    pub fn is_critical(&self) -> bool {
        self.critical_tier > 0
    }

    /// Damage the target's armor removed
    pub fn mitigated_by_armor(&self) -> f64 {
        if self.armor_factor <= 0.0 {
            return self.pre_armor_damage();
        }
        self.final_damage / self.armor_factor - self.final_damage
    }

    /// Damage before the armor stage
    pub fn pre_armor_damage(&self) -> f64 {
        (self.base_damage
            * self.element_multiplier
            * self.physical_multiplier
            * self.critical_multiplier
            * (1.0 + self.faction_modifier))
            .max(0.0)
    }
}

/// Damage stages in fixed order: element, physical, critical, faction, armor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamagePipeline {
    pub armor: ArmorConstants,
}

impl DamagePipeline {
    pub fn new(armor: ArmorConstants) -> Self {
        DamagePipeline { armor }
    }

    /// Compute a hit, drawing the critical roll from `rng`
    pub fn compute(
        &self,
        base_damage: f64,
        usage: &UsageLayer,
        extra: &ExtraLayer,
        target: Option<&HitTarget>,
        rng: &mut impl Rng,
    ) -> DamageBreakdown {
        let draw = rng.gen_range(0.0..100.0);
        self.compute_with_draw(base_damage, usage, extra, target, draw)
    }

    /// Compute a hit with an explicit critical draw in [0, 100)
    pub fn compute_with_draw(
        &self,
        base_damage: f64,
        usage: &UsageLayer,
        extra: &ExtraLayer,
        target: Option<&HitTarget>,
        draw: f64,
    ) -> DamageBreakdown {
        // Step 1: Element multiplier
        let element_multiplier = usage.element_sum().max(1.0);

        // Step 2: Physical multiplier
        let physical_multiplier = usage.physical_sum().max(1.0);

        // Step 3: Critical tier
        let roll = CriticalRoll::from_chance(usage.critical_chance());
        let critical_tier = roll.tier_for_draw(draw);
        let critical_multiplier = critical_multiplier(critical_tier, usage.critical_damage());

        // Step 4: Faction bonus
        let faction_modifier = target
            .and_then(|t| t.faction.as_deref())
            .map(|faction| extra.faction_modifier(faction))
            .unwrap_or(0.0);

        // Step 5: Armor
        let armor_factor = match target {
            Some(t) => armor_reduction_factor(t.armor, &self.armor),
            None => 1.0,
        };

        let final_damage = (base_damage
            * element_multiplier
            * physical_multiplier
            * critical_multiplier
            * (1.0 + faction_modifier)
            * armor_factor)
            .max(0.0);

        DamageBreakdown {
            base_damage,
            element_multiplier,
            physical_multiplier,
            critical_tier,
            critical_multiplier,
            faction_modifier,
            armor_factor,
            final_damage,
        }
    }
}

/// Compute a hit with the default armor constants
pub fn compute_final_damage(
    base_damage: f64,
    usage: &UsageLayer,
    extra: &ExtraLayer,
    target: Option<&HitTarget>,
    rng: &mut impl Rng,
) -> DamageBreakdown {
    DamagePipeline::default().compute(base_damage, usage, extra, target, rng)
}
