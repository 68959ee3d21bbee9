//! Corrosive - stacking armor reduction, one modifier per stack

use super::{ArmorModifier, EffectFamily, ModifierId, TickReport, TriggerContext};
use crate::config::CorrosiveConstants;
use crate::types::EntityId;
use crate::world::CombatWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One corrosive stack and the modifier it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrosiveEntry {
    pub amplifier: u32,
    pub modifier: ModifierId,
    /// Signed modifier amount, e.g. -0.26
    pub amount: f64,
    pub ticks_remaining: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CorrosiveManager {
    constants: CorrosiveConstants,
    entries: BTreeMap<EntityId, Vec<CorrosiveEntry>>,
}

impl CorrosiveManager {
    pub fn new(constants: CorrosiveConstants) -> Self {
        CorrosiveManager {
            constants,
            entries: BTreeMap::new(),
        }
    }

    /// `-min(base + (level - 1) * per_level, max)` with `level = amplifier + 1`
    pub fn reduction_for(&self, amplifier: u32) -> f64 {
        let c = &self.constants;
        -(c.base_reduction + amplifier as f64 * c.reduction_per_level).min(c.max_reduction)
    }

    /// Add a stack; the stack past the cap is rejected
    pub fn trigger<W: CombatWorld + ?Sized>(
        &mut self,
        world: &mut W,
        ctx: &TriggerContext,
        modifier: ModifierId,
    ) -> bool {
        let amount = self.reduction_for(ctx.amplifier);
        let stacks = self.entries.get(&ctx.target).map(Vec::len).unwrap_or(0);
        if stacks >= self.constants.max_entries {
            tracing::debug!("Corrosive on {} rejected at {} stacks", ctx.target, stacks);
            return false;
        }

        let applied = world.add_armor_modifier(
            ctx.target,
            ArmorModifier {
                id: modifier,
                family: EffectFamily::Corrosive,
                amount,
            },
        );
        if !applied {
            return false;
        }

        tracing::debug!(
            "Corrosive stack {} on {} ({:+.2} armor)",
            stacks + 1,
            ctx.target,
            amount
        );
        self.entries.entry(ctx.target).or_default().push(CorrosiveEntry {
            amplifier: ctx.amplifier,
            modifier,
            amount,
            ticks_remaining: self.constants.duration_ticks,
        });
        true
    }

    /// Count down every stack; expired stacks remove only their own modifier
    pub fn tick<W: CombatWorld + ?Sized>(&mut self, world: &mut W, report: &mut TickReport) {
        let targets: Vec<EntityId> = self.entries.keys().copied().collect();

        for target in targets {
            if !world.contains(target) {
                self.entries.remove(&target);
                report.mark(target, EffectFamily::Corrosive);
                continue;
            }

            let Some(entries) = self.entries.get_mut(&target) else {
                continue;
            };

            let mut expired = 0;
            entries.retain_mut(|entry| {
                entry.ticks_remaining = entry.ticks_remaining.saturating_sub(1);
                if entry.ticks_remaining > 0 {
                    return true;
                }
                world.remove_armor_modifier(target, entry.modifier);
                expired += 1;
                false
            });

            if expired > 0 {
                tracing::debug!("{} corrosive stacks expired on {}", expired, target);
                report.mark(target, EffectFamily::Corrosive);
            }
            if entries.is_empty() {
                self.entries.remove(&target);
            }
        }
    }

    /// Drop every stack and its modifier
    pub fn clear_entity<W: CombatWorld + ?Sized>(&mut self, world: &mut W, id: EntityId) -> bool {
        let Some(entries) = self.entries.remove(&id) else {
            return false;
        };
        for entry in entries {
            world.remove_armor_modifier(id, entry.modifier);
        }
        true
    }

    pub fn entries(&self, id: EntityId) -> &[CorrosiveEntry] {
        self.entries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stacks(&self, id: EntityId) -> usize {
        self.entries(id).len()
    }

    pub fn has_entries(&self, id: EntityId) -> bool {
        self.stacks(id) > 0
    }
}
