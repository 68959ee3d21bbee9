//! ShieldState - current shield, regeneration and gating

use super::DefensiveAttributes;
use crate::types::TICKS_PER_SECOND;
use serde::{Deserialize, Serialize};

/// Outcome of a hit against the shield
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShieldAbsorb {
    /// Damage taken by the shield
    pub absorbed: f64,
    /// Damage that passes through to health
    pub overflow: f64,
    /// Whether gating suppressed the overflow
    pub gated: bool,
}

/// Per-combatant shield state
///
/// Every hit restarts the regen cooldown (the depleted delay when the shield
/// is empty). Breaking the shield opens a gate of `immunity_ticks`; the hit
/// that broke it and any hit landing inside the gate don't reach health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShieldState {
    pub current: f64,
    regen_cooldown: u32,
    gate_remaining: u32,
}

impl ShieldState {
    /// A full shield for the given attributes
    pub fn full(attrs: &DefensiveAttributes) -> Self {
        ShieldState {
            current: attrs.max_shield,
            regen_cooldown: 0,
            gate_remaining: 0,
        }
    }

    pub fn is_gated(&self) -> bool {
        self.gate_remaining > 0
    }

    pub fn is_regenerating(&self, attrs: &DefensiveAttributes) -> bool {
        self.regen_cooldown == 0 && self.current < attrs.max_shield
    }

    pub fn regen_cooldown(&self) -> u32 {
        self.regen_cooldown
    }

    /// Shield percentage remaining
    pub fn percent(&self, attrs: &DefensiveAttributes) -> f64 {
        if attrs.max_shield <= 0.0 {
            return 0.0;
        }
        (self.current / attrs.max_shield * 100.0).clamp(0.0, 100.0)
    }

    /// Route a hit through the shield
    pub fn absorb(&mut self, damage: f64, attrs: &DefensiveAttributes) -> ShieldAbsorb {
        if damage <= 0.0 {
            return ShieldAbsorb::default();
        }

        if self.is_gated() {
            self.restart_cooldown(attrs);
            return ShieldAbsorb {
                absorbed: 0.0,
                overflow: 0.0,
                gated: true,
            };
        }

        let had_shield = self.current > 0.0;
        let absorbed = damage.min(self.current.max(0.0));
        self.current = (self.current - absorbed).max(0.0);
        let mut overflow = damage - absorbed;
        let mut gated = false;

        if had_shield && self.current <= 0.0 && attrs.immunity_ticks > 0 {
            self.gate_remaining = attrs.immunity_ticks;
            overflow = 0.0;
            gated = true;
        }

        self.restart_cooldown(attrs);
        ShieldAbsorb {
            absorbed,
            overflow,
            gated,
        }
    }

    /// Advance one tick; returns true if the shield value changed
    pub fn tick(&mut self, attrs: &DefensiveAttributes) -> bool {
        self.gate_remaining = self.gate_remaining.saturating_sub(1);

        if self.regen_cooldown > 0 {
            self.regen_cooldown -= 1;
            return false;
        }

        if self.current >= attrs.max_shield {
            return false;
        }

        let per_tick = attrs.regen_rate / TICKS_PER_SECOND as f64;
        self.current = (self.current + per_tick).min(attrs.max_shield);
        true
    }

    /// Restart regeneration as if the shield had just been depleted
    pub fn interrupt_regen(&mut self, attrs: &DefensiveAttributes) {
        self.regen_cooldown = attrs.depleted_regen_delay_ticks;
    }

    /// Clamp to a new maximum after the attributes were recomputed
    pub fn rescale(&mut self, attrs: &DefensiveAttributes) {
        self.current = self.current.min(attrs.max_shield);
    }

    fn restart_cooldown(&mut self, attrs: &DefensiveAttributes) {
        self.regen_cooldown = if self.current <= 0.0 {
            attrs.depleted_regen_delay_ticks
        } else {
            attrs.regen_delay_ticks
        };
    }
}
