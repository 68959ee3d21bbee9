//! Prelude module for convenient imports
//!
//! ```rust
//! use element_core::prelude::*;
//! ```

// Core types
pub use crate::types::{EntityId, Position};

// Elements and weapons
pub use crate::element::{ElementTable, UsageLayer};
pub use crate::weapon::{Correction, FactionBonus, WeaponElementData};

// Damage system
pub use crate::damage::{DamageBreakdown, DamagePipeline, DamageSource, HitTarget};

// Combat
pub use crate::combat::{attack, AttackOutcome, CombatContext};

// Effects
pub use crate::effect::{EffectFamily, EffectRegistry, TickReport};

// Defenses and hosts
pub use crate::defense::{CombatantProfile, DefensiveAttributes};
pub use crate::world::{Arena, CombatWorld};

// Config
pub use crate::config::GameConstants;
