//! Tick-driven combat simulation over a scenario

use crate::scenario::Scenario;
use element_core::world::DamageRecord;
use element_core::{
    attack, Arena, CombatContext, DamageKind, EntityId, WeaponElementData, TICKS_PER_SECOND,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// A combatant that died during the run
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub tick: u32,
    pub name: String,
    pub kind: DamageKind,
}

/// Totals collected over a run
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    pub ticks: u32,
    pub hit_count: u32,
    /// Hits per critical tier
    pub crit_tiers: BTreeMap<u32, u32>,
    pub triggers_applied: usize,
    pub detonations: usize,
    /// Damage dealt by weapon hits, shields included
    pub direct_damage: f64,
    /// Damage dealt by status effects, per kind
    pub effect_damage: BTreeMap<DamageKind, f64>,
    pub kills: Vec<Kill>,
    pub replication_events: usize,
}

impl SimulationReport {
    pub fn total_effect_damage(&self) -> f64 {
        self.effect_damage.values().sum()
    }

    pub fn total_damage(&self) -> f64 {
        self.direct_damage + self.total_effect_damage()
    }

    /// Damage per second of simulated time
    pub fn dps(&self) -> f64 {
        let seconds = self.ticks as f64 / TICKS_PER_SECOND as f64;
        if seconds > 0.0 {
            self.total_damage() / seconds
        } else {
            0.0
        }
    }

    /// Percentage of hits that reached at least tier 1
    pub fn crit_rate(&self) -> f64 {
        if self.hit_count == 0 {
            return 0.0;
        }
        let crits: u32 = self
            .crit_tiers
            .iter()
            .filter(|(tier, _)| **tier > 0)
            .map(|(_, &count)| count)
            .sum();
        crits as f64 / self.hit_count as f64 * 100.0
    }

    pub fn avg_hit(&self) -> f64 {
        if self.hit_count > 0 {
            self.direct_damage / self.hit_count as f64
        } else {
            0.0
        }
    }

    fn record_damage(&mut self, tick: u32, arena: &Arena, record: &DamageRecord) {
        let dealt = record.absorbed_by_shield + record.to_health;
        if record.kind.is_effect() {
            *self.effect_damage.entry(record.kind).or_insert(0.0) += dealt;
        } else {
            self.direct_damage += dealt;
        }

        if record.killing_blow {
            let name = arena
                .get(record.target)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| record.target.to_string());
            self.kills.push(Kill {
                tick,
                name,
                kind: record.kind,
            });
        }
    }
}

/// One scenario being played out
pub struct Simulation {
    ctx: CombatContext,
    arena: Arena,
    weapon: WeaponElementData,
    base_damage: f64,
    attacker: Option<EntityId>,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        let mut arena = Arena::new();
        let mut attacker = None;
        for entry in scenario.combatants {
            let is_player = entry.profile.is_player;
            let id = arena.spawn(&entry.name, entry.profile, entry.health, entry.position);
            if is_player && attacker.is_none() {
                attacker = Some(id);
            }
        }

        Simulation {
            ctx: CombatContext::new(&scenario.constants),
            arena,
            weapon: scenario.weapon,
            base_damage: scenario.base_damage,
            attacker,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// First living non-player, in spawn order
    fn current_target(&self) -> Option<EntityId> {
        self.arena
            .iter()
            .find(|c| c.is_alive() && !c.profile.is_player)
            .map(|c| c.id)
    }

    /// Run until `ticks` elapse or no enemy is left
    pub fn run(&mut self, ticks: u32, attack_interval: u32) -> SimulationReport {
        let interval = attack_interval.max(1);
        let mut report = SimulationReport::default();

        for tick in 0..ticks {
            if tick % interval == 0 {
                let Some(target) = self.current_target() else {
                    tracing::info!("All enemies down at tick {}", tick);
                    break;
                };
                self.fire(target, &mut report);
            }

            let effects = self.ctx.effects.tick(&mut self.arena);
            report.detonations += effects.detonations.len();
            self.arena.tick();

            self.collect(tick, &mut report);
            report.ticks = tick + 1;
        }

        report
    }

    fn fire(&mut self, target: EntityId, report: &mut SimulationReport) {
        let outcome = attack(
            &mut self.ctx,
            &mut self.arena,
            self.attacker,
            target,
            &mut self.weapon,
            self.base_damage,
            &mut self.rng,
        );
        let Some(outcome) = outcome else {
            return;
        };

        report.hit_count += 1;
        *report
            .crit_tiers
            .entry(outcome.breakdown.critical_tier)
            .or_insert(0) += 1;
        report.triggers_applied += outcome.triggers_applied;
        tracing::debug!("Hit {}: {}", target, outcome.summary());
    }

    /// Fold this tick's damage log into the report and drop effects on the dead
    fn collect(&mut self, tick: u32, report: &mut SimulationReport) {
        for record in self.arena.take_damage_log() {
            report.record_damage(tick, &self.arena, &record);
            if record.killing_blow {
                tracing::info!("{} died at tick {} ({})", record.target, tick, record.kind);
                self.ctx.effects.clear_entity(&mut self.arena, record.target);
            }
        }

        report.replication_events += self.arena.take_replication_events().len();
        report.replication_events += self.ctx.effects.take_replication_events().len();
    }
}
