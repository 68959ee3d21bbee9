//! Blast - fused charges that detonate alone or in one burst

use super::{EffectFamily, TickReport, TriggerContext};
use crate::config::BlastConstants;
use crate::damage::{DamageKind, DamageSource};
use crate::types::EntityId;
use crate::world::CombatWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One blast charge stacked on a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastEntry {
    pub amplifier: u32,
    pub hit_damage: f64,
    pub source: DamageSource,
    pub age: u32,
    /// Already detonated individually; kept as a spent stack until lifetime ends
    pub detonated: bool,
}

impl BlastEntry {
    fn is_ready(&self, fuse: u32) -> bool {
        !self.detonated && self.age >= fuse
    }

    fn damage(&self, ratio: f64) -> f64 {
        ratio * (self.amplifier + 1) as f64 * self.hit_damage
    }
}

/// A resolved explosion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    /// Combatant the charges were stacked on
    pub origin: EntityId,
    pub radius: f64,
    /// Damage dealt to each victim before their own mitigation
    pub damage: f64,
    pub victims: Vec<EntityId>,
    pub burst: bool,
    /// Total damage that reached health across all victims
    pub dealt: f64,
}

/// Owns every blast charge, keyed by target
#[derive(Debug, Clone, Default)]
pub struct BlastManager {
    constants: BlastConstants,
    entries: BTreeMap<EntityId, Vec<BlastEntry>>,
}

impl BlastManager {
    pub fn new(constants: BlastConstants) -> Self {
        BlastManager {
            constants,
            entries: BTreeMap::new(),
        }
    }

    /// Stack a charge; rejected once the target carries the maximum
    pub fn trigger(&mut self, ctx: &TriggerContext) -> bool {
        let entries = self.entries.entry(ctx.target).or_default();
        if entries.len() >= self.constants.max_level as usize {
            tracing::debug!("Blast on {} rejected at {} charges", ctx.target, entries.len());
            return false;
        }

        entries.push(BlastEntry {
            amplifier: ctx.amplifier,
            hit_damage: ctx.hit_damage,
            source: DamageSource::effect(DamageKind::Blast, ctx.attacker),
            age: 0,
            detonated: false,
        });
        tracing::debug!(
            "Blast charge {} on {} (amplifier {})",
            entries.len(),
            ctx.target,
            ctx.amplifier
        );
        true
    }

    /// Age every charge and resolve the ones whose fuse ran out
    pub fn tick<W: CombatWorld + ?Sized>(&mut self, world: &mut W, report: &mut TickReport) {
        let targets: Vec<EntityId> = self.entries.keys().copied().collect();

        for target in targets {
            if !world.contains(target) {
                self.entries.remove(&target);
                report.mark(target, EffectFamily::Blast);
                continue;
            }

            let Some(mut entries) = self.entries.remove(&target) else {
                continue;
            };

            for entry in entries.iter_mut() {
                entry.age += 1;
            }

            let fuse = self.constants.fuse_ticks;
            let ready: Vec<usize> = (0..entries.len())
                .filter(|&i| entries[i].is_ready(fuse))
                .collect();

            if !ready.is_empty() {
                let max_level = self.constants.max_level;
                let combined: u32 = ready.iter().map(|&i| entries[i].amplifier).sum();
                let burst =
                    entries.len() >= max_level as usize || (ready.len() >= 2 && combined >= max_level);

                if burst {
                    let damage: f64 = entries
                        .iter()
                        .filter(|e| !e.detonated)
                        .map(|e| e.damage(self.constants.damage_ratio))
                        .sum();
                    let source = entries[ready[0]].source;
                    let radius = self.constants.burst_radius;
                    if let Some(d) = detonate(world, target, radius, damage, &source, true) {
                        report.record_detonation(d);
                    }
                    entries.clear();
                } else {
                    for &i in &ready {
                        let damage = entries[i].damage(self.constants.damage_ratio);
                        let source = entries[i].source;
                        let radius = self.constants.single_radius;
                        if let Some(d) = detonate(world, target, radius, damage, &source, false) {
                            report.record_detonation(d);
                        }
                        entries[i].detonated = true;
                    }
                }
                report.mark(target, EffectFamily::Blast);
            }

            let lifetime = self.constants.lifetime_ticks;
            let before = entries.len();
            entries.retain(|e| e.age < lifetime);
            if entries.len() != before {
                report.mark(target, EffectFamily::Blast);
            }

            if !entries.is_empty() {
                self.entries.insert(target, entries);
            }
        }
    }

    pub fn clear_entity(&mut self, id: EntityId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn entries(&self, id: EntityId) -> &[BlastEntry] {
        self.entries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Charges that have not detonated yet
    pub fn pending_charges(&self, id: EntityId) -> usize {
        self.entries(id).iter().filter(|e| !e.detonated).count()
    }

    pub fn has_entries(&self, id: EntityId) -> bool {
        !self.entries(id).is_empty()
    }
}

/// Damage every living non-player around `origin`, plus `origin` itself
fn detonate<W: CombatWorld + ?Sized>(
    world: &mut W,
    origin: EntityId,
    radius: f64,
    damage: f64,
    source: &DamageSource,
    burst: bool,
) -> Option<Detonation> {
    let center = world.position(origin)?;

    let mut victims: Vec<EntityId> = world
        .living_entities_within(&center, radius)
        .into_iter()
        .filter(|&id| id != origin && !world.is_player(id))
        .collect();
    if world.is_alive(origin) {
        victims.insert(0, origin);
    }

    tracing::debug!(
        "Blast {} on {}: {:.1} damage, radius {}, {} victims",
        if burst { "burst" } else { "detonation" },
        origin,
        damage,
        radius,
        victims.len()
    );

    let dealt: f64 = victims
        .iter()
        .map(|&victim| world.apply_damage(victim, damage, source).overflow)
        .sum();

    Some(Detonation {
        origin,
        radius,
        damage,
        victims,
        burst,
        dealt,
    })
}
