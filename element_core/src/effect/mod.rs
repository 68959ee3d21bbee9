//! Status effects - per-family managers and the registry that schedules them

pub mod blast;
pub mod corrosive;
pub mod dot;
pub mod gas;
pub mod heat;
mod modifier;

pub use blast::{BlastEntry, BlastManager, Detonation};
pub use corrosive::{CorrosiveEntry, CorrosiveManager};
pub use dot::{DotApplication, DotEntry, DotManager, DotOrigin};
pub use gas::{CloudId, GasCloud, GasManager, VisualCue};
pub use heat::{HeatEntry, HeatManager};
pub use modifier::{ArmorModifier, ModifierId, ModifierSet};

use crate::config::GameConstants;
use crate::damage::{DamageKind, DamageSource, TriggerFamily, TriggerRequest};
use crate::types::EntityId;
use crate::world::{CombatWorld, ReplicationEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Highest effect level; amplifiers run from 0 to `MAX_LEVEL - 1`
pub const MAX_LEVEL: u32 = 10;

/// Manager owning a kind of status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectFamily {
    Dot,
    Blast,
    Gas,
    Corrosive,
    Heat,
}

impl EffectFamily {
    pub const ALL: [EffectFamily; 5] = [
        EffectFamily::Dot,
        EffectFamily::Blast,
        EffectFamily::Gas,
        EffectFamily::Corrosive,
        EffectFamily::Heat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EffectFamily::Dot => "dot",
            EffectFamily::Blast => "blast",
            EffectFamily::Gas => "gas",
            EffectFamily::Corrosive => "corrosive",
            EffectFamily::Heat => "heat",
        }
    }
}

impl fmt::Display for EffectFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs of a single trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub target: EntityId,
    pub amplifier: u32,
    /// Final damage of the hit that caused the trigger
    pub hit_damage: f64,
    pub attacker: Option<EntityId>,
}

/// What one registry tick did
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Damage that reached health, by source kind
    pub damage_by_kind: Vec<(DamageKind, f64)>,
    pub total_damage: f64,
    pub detonations: Vec<Detonation>,
    pub cues: Vec<VisualCue>,
    /// Combatants whose entries changed, per family
    pub changed: BTreeSet<(EntityId, EffectFamily)>,
}

impl TickReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_damage(&mut self, kind: DamageKind, amount: f64) {
        if let Some(entry) = self.damage_by_kind.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 += amount;
        } else {
            self.damage_by_kind.push((kind, amount));
        }
        self.total_damage += amount;
    }

    pub fn damage_of_kind(&self, kind: DamageKind) -> f64 {
        self.damage_by_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, amount)| *amount)
            .unwrap_or(0.0)
    }

    pub fn mark(&mut self, entity: EntityId, family: EffectFamily) {
        self.changed.insert((entity, family));
    }

    pub fn record_detonation(&mut self, detonation: Detonation) {
        self.add_damage(DamageKind::Blast, detonation.dealt);
        self.detonations.push(detonation);
    }
}

/// Owns every status effect manager and schedules them
///
/// Managers tick in a fixed order: DoT, Blast, Gas, Corrosive, Heat. DoTs
/// produced by gas clouds are applied once the gas manager has finished
/// and pulse from the next tick on.
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    dot: DotManager,
    blast: BlastManager,
    gas: GasManager,
    corrosive: CorrosiveManager,
    heat: HeatManager,
    next_modifier_id: u64,
    events: Vec<ReplicationEvent>,
}

impl EffectRegistry {
    pub fn new(constants: &GameConstants) -> Self {
        EffectRegistry {
            dot: DotManager::new(constants.dot.clone()),
            blast: BlastManager::new(constants.blast.clone()),
            gas: GasManager::new(constants.gas.clone()),
            corrosive: CorrosiveManager::new(constants.corrosive.clone()),
            heat: HeatManager::new(constants.heat.clone()),
            next_modifier_id: 0,
            events: Vec::new(),
        }
    }

    fn allocate_modifier(&mut self) -> ModifierId {
        self.next_modifier_id += 1;
        ModifierId(self.next_modifier_id)
    }

    fn emit(&mut self, entity: EntityId, family: EffectFamily) {
        self.events
            .push(ReplicationEvent::EffectsChanged { entity, family });
    }

    /// Start the effects a hit requested
    ///
    /// Guarded sources dispatch nothing. Returns how many triggers took hold.
    pub fn dispatch<W: CombatWorld + ?Sized>(
        &mut self,
        world: &mut W,
        target: EntityId,
        requests: &[TriggerRequest],
        hit_damage: f64,
        source: &DamageSource,
    ) -> usize {
        if source.is_guarded() {
            return 0;
        }

        let mut applied = 0;
        for request in requests {
            let ctx = TriggerContext {
                target,
                amplifier: request.amplifier,
                hit_damage,
                attacker: source.attacker,
            };
            if self.trigger(world, request.family, &ctx) {
                applied += 1;
            }
        }
        applied
    }

    /// Start one effect on a target; returns false if it was rejected
    pub fn trigger<W: CombatWorld + ?Sized>(
        &mut self,
        world: &mut W,
        family: TriggerFamily,
        ctx: &TriggerContext,
    ) -> bool {
        if !world.contains(ctx.target) || !world.is_alive(ctx.target) {
            return false;
        }

        let amplifier = ctx.amplifier.min(MAX_LEVEL - 1);
        let ctx = TriggerContext { amplifier, ..*ctx };

        let (applied, effect) = match family {
            TriggerFamily::Heat => {
                let id = self.allocate_modifier();
                (self.heat.trigger(world, &ctx, id), Some(EffectFamily::Heat))
            }
            TriggerFamily::Bleed => {
                let damage = self.dot.bleed_damage(amplifier, ctx.hit_damage);
                let application = DotApplication::from_hit(
                    ctx.target,
                    DamageKind::Bleed,
                    ctx.attacker,
                    amplifier,
                    damage,
                );
                self.dot.apply(application);
                (true, Some(EffectFamily::Dot))
            }
            TriggerFamily::Poison => {
                let damage = self.dot.poison_damage(amplifier, ctx.hit_damage);
                let application = DotApplication::from_hit(
                    ctx.target,
                    DamageKind::Poison,
                    ctx.attacker,
                    amplifier,
                    damage,
                );
                self.dot.apply(application);
                (true, Some(EffectFamily::Dot))
            }
            TriggerFamily::Blast => (self.blast.trigger(&ctx), Some(EffectFamily::Blast)),
            TriggerFamily::Gas => (
                self.gas.trigger(&*world, &ctx).is_some(),
                Some(EffectFamily::Gas),
            ),
            TriggerFamily::Corrosive => {
                let id = self.allocate_modifier();
                (
                    self.corrosive.trigger(world, &ctx, id),
                    Some(EffectFamily::Corrosive),
                )
            }
            TriggerFamily::Magnetic => (world.interrupt_shield_regen(ctx.target), None),
        };

        if applied {
            tracing::debug!(
                "Triggered {} on {} at amplifier {}",
                family,
                ctx.target,
                amplifier
            );
            if let Some(effect) = effect {
                self.emit(ctx.target, effect);
            }
        }
        applied
    }

    /// Advance every manager by one tick
    pub fn tick<W: CombatWorld + ?Sized>(&mut self, world: &mut W) -> TickReport {
        let mut report = TickReport::new();

        self.dot.tick(world, &mut report);
        self.blast.tick(world, &mut report);

        let applications = self.gas.tick(&*world, &mut report);
        for application in applications {
            let target = application.target;
            if self.dot.apply(application) {
                report.mark(target, EffectFamily::Dot);
            }
        }

        self.corrosive.tick(world, &mut report);
        self.heat.tick(world, &mut report);

        for &(entity, family) in &report.changed {
            self.events
                .push(ReplicationEvent::EffectsChanged { entity, family });
        }

        tracing::trace!(
            "Effect tick: {:.1} damage, {} detonations, {} changes",
            report.total_damage,
            report.detonations.len(),
            report.changed.len()
        );
        report
    }

    /// Remove every effect on a combatant, including its armor modifiers
    ///
    /// Gas clouds that spawned on it keep drifting until their own lifetime
    /// ends. Calling it again, or for an unknown combatant, does nothing.
    pub fn clear_entity<W: CombatWorld + ?Sized>(&mut self, world: &mut W, id: EntityId) {
        let cleared = [
            (EffectFamily::Dot, self.dot.clear_entity(id)),
            (EffectFamily::Blast, self.blast.clear_entity(id)),
            (EffectFamily::Corrosive, self.corrosive.clear_entity(world, id)),
            (EffectFamily::Heat, self.heat.clear_entity(world, id)),
        ];

        for (family, had_entries) in cleared {
            if had_entries {
                self.emit(id, family);
            }
        }
    }

    /// Families with live entries on a combatant
    pub fn active_families(&self, id: EntityId) -> Vec<EffectFamily> {
        EffectFamily::ALL
            .into_iter()
            .filter(|&family| self.has_family(id, family))
            .collect()
    }

    /// Clouds are battlefield state, so `Gas` is never a combatant's family
    pub fn has_family(&self, id: EntityId, family: EffectFamily) -> bool {
        match family {
            EffectFamily::Dot => self.dot.has_entries(id),
            EffectFamily::Blast => self.blast.has_entries(id),
            EffectFamily::Gas => false,
            EffectFamily::Corrosive => self.corrosive.has_entries(id),
            EffectFamily::Heat => self.heat.has_entries(id),
        }
    }

    pub fn has_effects(&self, id: EntityId) -> bool {
        !self.active_families(id).is_empty()
    }

    /// Drain queued replication events
    pub fn take_replication_events(&mut self) -> Vec<ReplicationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn dot(&self) -> &DotManager {
        &self.dot
    }

    pub fn blast(&self) -> &BlastManager {
        &self.blast
    }

    pub fn gas(&self) -> &GasManager {
        &self.gas
    }

    pub fn corrosive(&self) -> &CorrosiveManager {
        &self.corrosive
    }

    pub fn heat(&self) -> &HeatManager {
        &self.heat
    }
}
