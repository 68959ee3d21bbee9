//! DoT (Damage over Time) - bleed, poison and gas-cloud damage

use super::{CloudId, EffectFamily, TickReport};
use crate::config::DotConstants;
use crate::damage::{DamageKind, DamageSource};
use crate::types::EntityId;
use crate::world::CombatWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What applied a DoT; a new application with the same origin refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotOrigin {
    /// A direct hit of `kind` from `attacker`
    Hit {
        kind: DamageKind,
        attacker: Option<EntityId>,
    },
    /// A gas cloud
    Cloud(CloudId),
}

/// A pending DoT application, produced by a trigger or a gas cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotApplication {
    pub target: EntityId,
    pub origin: DotOrigin,
    pub source: DamageSource,
    pub amplifier: u32,
    pub damage_per_pulse: f64,
}

impl DotApplication {
    /// A DoT started by a direct hit
    pub fn from_hit(
        target: EntityId,
        kind: DamageKind,
        attacker: Option<EntityId>,
        amplifier: u32,
        damage_per_pulse: f64,
    ) -> Self {
        DotApplication {
            target,
            origin: DotOrigin::Hit { kind, attacker },
            source: DamageSource::effect(kind, attacker),
            amplifier,
            damage_per_pulse,
        }
    }
}

/// An active DoT instance on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotEntry {
    pub origin: DotOrigin,
    /// Captured guarded source used for every pulse
    pub source: DamageSource,
    pub amplifier: u32,
    pub damage_per_pulse: f64,
    /// Ticks since creation; pulses land on multiples of the interval
    pub age: u32,
    pub ticks_remaining: u32,
}

impl DotEntry {
    fn new(application: DotApplication, duration: u32) -> Self {
        DotEntry {
            origin: application.origin,
            source: application.source,
            amplifier: application.amplifier,
            damage_per_pulse: application.damage_per_pulse,
            age: 0,
            ticks_remaining: duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.ticks_remaining > 0
    }

    /// Refresh the countdown, keeping the higher damage
    pub fn refresh(&mut self, duration: u32, damage_per_pulse: f64, amplifier: u32) {
        if damage_per_pulse > self.damage_per_pulse {
            self.damage_per_pulse = damage_per_pulse;
        }
        self.amplifier = self.amplifier.max(amplifier);
        self.ticks_remaining = duration;
    }

    /// Damage this entry will still deal if left alone
    pub fn total_remaining_damage(&self, interval: u32) -> f64 {
        if interval == 0 {
            return 0.0;
        }
        let next_pulse = interval - self.age % interval;
        if self.ticks_remaining < next_pulse {
            return 0.0;
        }
        let pulses = 1 + (self.ticks_remaining - next_pulse) / interval;
        pulses as f64 * self.damage_per_pulse
    }
}

/// Owns every DoT entry, keyed by target
#[derive(Debug, Clone, Default)]
pub struct DotManager {
    constants: DotConstants,
    entries: BTreeMap<EntityId, Vec<DotEntry>>,
}

impl DotManager {
    pub fn new(constants: DotConstants) -> Self {
        DotManager {
            constants,
            entries: BTreeMap::new(),
        }
    }

    pub fn constants(&self) -> &DotConstants {
        &self.constants
    }

    /// Per-pulse damage of a bleed started by a hit
    pub fn bleed_damage(&self, amplifier: u32, hit_damage: f64) -> f64 {
        self.constants.bleed_ratio * (amplifier + 1) as f64 * hit_damage
    }

    /// Per-pulse damage of a poison started by a hit
    pub fn poison_damage(&self, amplifier: u32, hit_damage: f64) -> f64 {
        self.constants.poison_ratio * (amplifier + 1) as f64 * hit_damage
    }

    /// Apply a DoT; returns true if a new entry was created
    pub fn apply(&mut self, application: DotApplication) -> bool {
        let duration = self.constants.duration_ticks;
        let entries = self.entries.entry(application.target).or_default();

        if let Some(existing) = entries.iter_mut().find(|e| e.origin == application.origin) {
            existing.refresh(
                duration,
                application.damage_per_pulse,
                application.amplifier,
            );
            return false;
        }

        tracing::debug!(
            "DoT {} applied to {} for {:.1} per pulse",
            application.source.kind,
            application.target,
            application.damage_per_pulse
        );
        entries.push(DotEntry::new(application, duration));
        true
    }

    /// Advance every entry one tick, pulsing damage through `world`
    pub fn tick<W: CombatWorld + ?Sized>(&mut self, world: &mut W, report: &mut TickReport) {
        let interval = self.constants.interval_ticks.max(1);
        let targets: Vec<EntityId> = self.entries.keys().copied().collect();

        for target in targets {
            if !world.contains(target) || !world.is_alive(target) {
                self.entries.remove(&target);
                report.mark(target, EffectFamily::Dot);
                continue;
            }

            let Some(entries) = self.entries.get_mut(&target) else {
                continue;
            };

            for entry in entries.iter_mut() {
                entry.age += 1;
                entry.ticks_remaining = entry.ticks_remaining.saturating_sub(1);

                if entry.age % interval == 0 && world.is_alive(target) {
                    let dealt = world
                        .apply_damage(target, entry.damage_per_pulse, &entry.source)
                        .overflow;
                    tracing::trace!(
                        "DoT {} pulsed {} for {:.1}",
                        entry.source.kind,
                        target,
                        dealt
                    );
                    report.add_damage(entry.source.kind, dealt);
                }
            }

            let before = entries.len();
            entries.retain(|e| e.is_active());
            if entries.len() != before {
                tracing::debug!("{} DoT entries expired on {}", before - entries.len(), target);
                report.mark(target, EffectFamily::Dot);
            }
            if entries.is_empty() {
                self.entries.remove(&target);
            }
        }
    }

    /// Drop every entry on a combatant; returns true if any existed
    pub fn clear_entity(&mut self, id: EntityId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn entries(&self, id: EntityId) -> &[DotEntry] {
        self.entries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_entries(&self, id: EntityId) -> bool {
        !self.entries(id).is_empty()
    }

    /// Number of combatants with at least one DoT
    pub fn affected_count(&self) -> usize {
        self.entries.len()
    }
}
