//! Arena - an in-memory combatant store

use super::{CombatWorld, ReplicationEvent};
use crate::damage::{DamageKind, DamageSource};
use crate::defense::{CombatantProfile, DefensiveAttributes, ShieldAbsorb, ShieldState};
use crate::effect::{ArmorModifier, ModifierId, ModifierSet};
use crate::types::{EntityId, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A combatant with health, shields and armor modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub profile: CombatantProfile,
    /// Cached level-scaled defenses
    pub defenses: DefensiveAttributes,
    pub shield: ShieldState,
    pub armor_modifiers: ModifierSet,
    pub max_health: f64,
    pub current_health: f64,
    pub position: Position,
}

impl Combatant {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        profile: CombatantProfile,
        max_health: f64,
        position: Position,
    ) -> Self {
        let defenses = DefensiveAttributes::derive(&profile);
        let shield = ShieldState::full(&defenses);
        Combatant {
            id,
            name: name.into(),
            profile,
            defenses,
            shield,
            armor_modifiers: ModifierSet::new(),
            max_health,
            current_health: max_health,
            position,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    /// Armor after modifiers
    pub fn effective_armor(&self) -> f64 {
        self.armor_modifiers.apply(self.defenses.armor)
    }

    /// Get health percentage remaining
    pub fn health_percent(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.current_health / self.max_health * 100.0).clamp(0.0, 100.0)
    }

    /// Route damage through the shield, then health
    pub fn take_damage(&mut self, amount: f64) -> ShieldAbsorb {
        let absorb = self.shield.absorb(amount, &self.defenses);
        self.current_health = (self.current_health - absorb.overflow).max(0.0);
        absorb
    }

    /// Recompute defenses from the profile, keeping the current shield
    fn refresh_defenses(&mut self) {
        self.defenses = DefensiveAttributes::derive(&self.profile);
        self.shield.rescale(&self.defenses);
    }
}

/// One damage callback, kept for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub target: EntityId,
    pub kind: DamageKind,
    pub attacker: Option<EntityId>,
    pub requested: f64,
    pub absorbed_by_shield: f64,
    pub to_health: f64,
    pub killing_blow: bool,
}

/// In-memory `CombatWorld`
#[derive(Debug, Clone, Default)]
pub struct Arena {
    combatants: BTreeMap<EntityId, Combatant>,
    next_id: u64,
    damage_log: Vec<DamageRecord>,
    events: Vec<ReplicationEvent>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant at full health and shield
    pub fn spawn(
        &mut self,
        name: &str,
        profile: CombatantProfile,
        max_health: f64,
        position: Position,
    ) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        let combatant = Combatant::new(id, name, profile, max_health, position);
        tracing::debug!(
            "Spawned {} {} (level {}, armor {:.0}, shield {:.0})",
            name,
            id,
            combatant.defenses.level,
            combatant.defenses.armor,
            combatant.defenses.max_shield
        );
        self.combatants.insert(id, combatant);
        self.events.push(ReplicationEvent::DefensesChanged(id));
        id
    }

    /// Remove a combatant; the effect registry purges its entries next tick
    pub fn despawn(&mut self, id: EntityId) -> Option<Combatant> {
        self.combatants.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Change level and rescale defenses
    pub fn set_level(&mut self, id: EntityId, level: u32) -> bool {
        let Some(combatant) = self.combatants.get_mut(&id) else {
            return false;
        };
        combatant.profile.level = level;
        combatant.refresh_defenses();
        self.events.push(ReplicationEvent::DefensesChanged(id));
        true
    }

    /// Change faction and rescale defenses
    pub fn set_faction(&mut self, id: EntityId, faction: Option<&str>) -> bool {
        let Some(combatant) = self.combatants.get_mut(&id) else {
            return false;
        };
        combatant.profile.faction = faction.map(str::to_string);
        combatant.refresh_defenses();
        self.events.push(ReplicationEvent::DefensesChanged(id));
        true
    }

    pub fn set_position(&mut self, id: EntityId, position: Position) -> bool {
        match self.combatants.get_mut(&id) {
            Some(combatant) => {
                combatant.position = position;
                true
            }
            None => false,
        }
    }

    /// Drop health to zero without going through shields
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.combatants.get_mut(&id) {
            Some(combatant) => {
                combatant.current_health = 0.0;
                true
            }
            None => false,
        }
    }

    /// Advance shield regeneration by one tick
    pub fn tick(&mut self) {
        for combatant in self.combatants.values_mut() {
            if combatant.is_alive() {
                combatant.shield.tick(&combatant.defenses);
            }
        }
    }

    pub fn damage_log(&self) -> &[DamageRecord] {
        &self.damage_log
    }

    /// Drain the damage log
    pub fn take_damage_log(&mut self) -> Vec<DamageRecord> {
        std::mem::take(&mut self.damage_log)
    }

    pub fn take_replication_events(&mut self) -> Vec<ReplicationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl CombatWorld for Arena {
    fn contains(&self, id: EntityId) -> bool {
        self.combatants.contains_key(&id)
    }

    fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(Combatant::is_alive)
    }

    fn is_player(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|c| c.defenses.is_player)
    }

    fn position(&self, id: EntityId) -> Option<Position> {
        self.get(id).map(|c| c.position)
    }

    fn living_entities_within(&self, center: &Position, radius: f64) -> Vec<EntityId> {
        self.combatants
            .values()
            .filter(|c| c.is_alive() && center.is_within(&c.position, radius))
            .map(|c| c.id)
            .collect()
    }

    fn armor(&self, id: EntityId) -> Option<f64> {
        self.get(id).map(Combatant::effective_armor)
    }

    fn faction(&self, id: EntityId) -> Option<String> {
        self.get(id).and_then(|c| c.defenses.faction.clone())
    }

    fn apply_damage(
        &mut self,
        target: EntityId,
        amount: f64,
        source: &DamageSource,
    ) -> ShieldAbsorb {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return ShieldAbsorb::default();
        };
        if !combatant.is_alive() || amount <= 0.0 {
            return ShieldAbsorb::default();
        }

        let absorb = combatant.take_damage(amount);
        let killing_blow = !combatant.is_alive();
        if killing_blow {
            tracing::debug!("{} {} killed by {}", combatant.name, target, source.kind);
        }

        self.damage_log.push(DamageRecord {
            target,
            kind: source.kind,
            attacker: source.attacker,
            requested: amount,
            absorbed_by_shield: absorb.absorbed,
            to_health: absorb.overflow,
            killing_blow,
        });
        absorb
    }

    fn add_armor_modifier(&mut self, target: EntityId, modifier: ArmorModifier) -> bool {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return false;
        };
        combatant.armor_modifiers.add(modifier);
        self.events.push(ReplicationEvent::DefensesChanged(target));
        true
    }

    fn remove_armor_modifier(&mut self, target: EntityId, id: ModifierId) -> bool {
        let removed = self
            .combatants
            .get_mut(&target)
            .is_some_and(|c| c.armor_modifiers.remove(id));
        if removed {
            self.events.push(ReplicationEvent::DefensesChanged(target));
        }
        removed
    }

    fn interrupt_shield_regen(&mut self, target: EntityId) -> bool {
        match self.combatants.get_mut(&target) {
            Some(combatant) => {
                combatant.shield.interrupt_regen(&combatant.defenses);
                true
            }
            None => false,
        }
    }
}
