//! element_core - Elemental damage and status effect engine for game combatants
//!
//! This library provides:
//! - ElementTable: Element types and the pairs that combine into complex elements
//! - WeaponElementData: Layered element values attached to an item
//! - DamagePipeline: Usage layer + target defenses into a final damage number
//! - EffectRegistry: Heat, Corrosive, Blast, Gas and DoT status effects
//! - Defense: Level scaling, armor reduction and shield gating

pub mod combat;
pub mod config;
pub mod damage;
pub mod defense;
pub mod effect;
pub mod element;
pub mod prelude;
pub mod types;
pub mod weapon;
pub mod world;

// Re-export core types for convenience
pub use combat::{attack, attack_with_draw, AttackOutcome, CombatContext};
pub use config::{ConfigError, GameConstants};
pub use damage::{
    compute_final_damage, CriticalRoll, DamageBreakdown, DamageKind, DamagePipeline, DamageSource,
    HitTarget, TriggerFamily, TriggerRequest,
};
pub use defense::{CombatantProfile, DefensiveAttributes, ShieldState};
pub use effect::{EffectFamily, EffectRegistry, TickReport, MAX_LEVEL};
pub use element::{ElementCategory, ElementError, ElementTable, ElementType, UsageLayer};
pub use types::{EntityId, Position, TICKS_PER_SECOND};
pub use weapon::{Correction, FactionBonus, TagError, WeaponElementData};
pub use world::{Arena, CombatWorld, Combatant, ReplicationEvent};
