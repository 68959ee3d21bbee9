//! Heat - a single non-stacking armor reduction

use super::{ArmorModifier, EffectFamily, ModifierId, TickReport, TriggerContext};
use crate::config::HeatConstants;
use crate::types::EntityId;
use crate::world::CombatWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatEntry {
    pub amplifier: u32,
    pub modifier: ModifierId,
    pub ticks_remaining: u32,
}

/// At most one entry per combatant; a re-trigger replaces it
#[derive(Debug, Clone, Default)]
pub struct HeatManager {
    constants: HeatConstants,
    entries: BTreeMap<EntityId, HeatEntry>,
}

impl HeatManager {
    pub fn new(constants: HeatConstants) -> Self {
        HeatManager {
            constants,
            entries: BTreeMap::new(),
        }
    }

    pub fn trigger<W: CombatWorld + ?Sized>(
        &mut self,
        world: &mut W,
        ctx: &TriggerContext,
        modifier: ModifierId,
    ) -> bool {
        if let Some(previous) = self.entries.remove(&ctx.target) {
            world.remove_armor_modifier(ctx.target, previous.modifier);
        }

        let applied = world.add_armor_modifier(
            ctx.target,
            ArmorModifier {
                id: modifier,
                family: EffectFamily::Heat,
                amount: -self.constants.armor_reduction,
            },
        );
        if !applied {
            return false;
        }

        tracing::debug!("Heat on {} (amplifier {})", ctx.target, ctx.amplifier);
        self.entries.insert(
            ctx.target,
            HeatEntry {
                amplifier: ctx.amplifier,
                modifier,
                ticks_remaining: self.constants.duration_ticks,
            },
        );
        true
    }

    pub fn tick<W: CombatWorld + ?Sized>(&mut self, world: &mut W, report: &mut TickReport) {
        self.entries.retain(|&target, entry| {
            if !world.contains(target) {
                report.mark(target, EffectFamily::Heat);
                return false;
            }

            entry.ticks_remaining = entry.ticks_remaining.saturating_sub(1);
            if entry.ticks_remaining > 0 {
                return true;
            }

            tracing::debug!("Heat expired on {}", target);
            world.remove_armor_modifier(target, entry.modifier);
            report.mark(target, EffectFamily::Heat);
            false
        });
    }

    pub fn clear_entity<W: CombatWorld + ?Sized>(&mut self, world: &mut W, id: EntityId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        world.remove_armor_modifier(id, entry.modifier);
        true
    }

    pub fn entry(&self, id: EntityId) -> Option<&HeatEntry> {
        self.entries.get(&id)
    }

    pub fn has_entries(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }
}
