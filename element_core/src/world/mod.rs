//! World interface - the combatant store the engine reads and damages

mod arena;

pub use arena::{Arena, Combatant, DamageRecord};

use crate::damage::{DamageSource, HitTarget};
use crate::defense::ShieldAbsorb;
use crate::effect::{ArmorModifier, EffectFamily, ModifierId};
use crate::types::{EntityId, Position};
use serde::{Deserialize, Serialize};

/// Combatant store and damage callback provided by the host
///
/// Every accessor returns `None`/`false` for unknown combatants; the engine
/// treats that as "nothing to do".
pub trait CombatWorld {
    fn contains(&self, id: EntityId) -> bool;

    fn is_alive(&self, id: EntityId) -> bool;

    fn is_player(&self, id: EntityId) -> bool;

    fn position(&self, id: EntityId) -> Option<Position>;

    /// Living combatants inside a sphere, in id order
    fn living_entities_within(&self, center: &Position, radius: f64) -> Vec<EntityId>;

    /// Effective armor after modifiers
    fn armor(&self, id: EntityId) -> Option<f64>;

    /// Lower-cased faction name
    fn faction(&self, id: EntityId) -> Option<String>;

    /// Deal damage; returns how the shield split it
    ///
    /// `overflow` is the damage that reached health. Unknown or dead targets
    /// return an empty split.
    fn apply_damage(
        &mut self,
        target: EntityId,
        amount: f64,
        source: &DamageSource,
    ) -> ShieldAbsorb;

    fn add_armor_modifier(&mut self, target: EntityId, modifier: ArmorModifier) -> bool;

    fn remove_armor_modifier(&mut self, target: EntityId, id: ModifierId) -> bool;

    /// Restart shield regeneration with the depleted delay
    fn interrupt_shield_regen(&mut self, target: EntityId) -> bool;

    /// Pipeline view of a combatant's defenses
    fn hit_target(&self, id: EntityId) -> Option<HitTarget> {
        let armor = self.armor(id)?;
        Some(HitTarget {
            armor,
            faction: self.faction(id),
        })
    }
}

/// Change the host should push to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicationEvent {
    /// Armor, shield maximum, level or faction changed
    DefensesChanged(EntityId),
    /// An effect family's entries for a combatant changed
    EffectsChanged {
        entity: EntityId,
        family: EffectFamily,
    },
}
