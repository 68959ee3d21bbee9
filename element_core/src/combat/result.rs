//! AttackOutcome - Outcome of one weapon attack

use crate::damage::{DamageBreakdown, TriggerRequest};
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Result of resolving one attack against one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub target: EntityId,
    /// Every stage of the damage calculation
    pub breakdown: DamageBreakdown,
    /// Damage that got past the shield
    pub damage_to_health: f64,
    /// Damage the shield took
    pub absorbed_by_shield: f64,
    /// Whether the shield gate swallowed the overflow
    pub shield_gated: bool,
    /// Effects the hit requested
    pub requested: Vec<TriggerRequest>,
    /// How many of them took hold
    pub triggers_applied: usize,
    pub is_killing_blow: bool,
}

impl AttackOutcome {
    pub fn final_damage(&self) -> f64 {
        self.breakdown.final_damage
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if self.breakdown.final_damage > 0.0 {
            parts.push(format!("{:.0} damage", self.breakdown.final_damage));
        }

        if self.breakdown.is_critical() {
            parts.push(format!("crit tier {}", self.breakdown.critical_tier));
        }

        let mitigated = self.breakdown.mitigated_by_armor();
        if mitigated > 0.0 {
            parts.push(format!("{:.0} reduced by armor", mitigated));
        }

        if self.absorbed_by_shield > 0.0 {
            parts.push(format!("{:.0} absorbed by shield", self.absorbed_by_shield));
        }

        if self.shield_gated {
            parts.push("shield gated".to_string());
        }

        if !self.requested.is_empty() {
            let families: Vec<&str> = self.requested.iter().map(|r| r.family.name()).collect();
            parts.push(format!("triggers: {}", families.join("/")));
        }

        if self.is_killing_blow {
            parts.push("FATAL".to_string());
        }

        if parts.is_empty() {
            "No damage".to_string()
        } else {
            parts.join(", ")
        }
    }
}
