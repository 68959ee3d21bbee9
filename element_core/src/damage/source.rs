//! DamageSource - who dealt a hit and whether it may trigger effects

use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// A direct weapon attack
    Attack,
    Bleed,
    Poison,
    GasCloud,
    Blast,
}

impl DamageKind {
    pub fn name(&self) -> &'static str {
        match self {
            DamageKind::Attack => "attack",
            DamageKind::Bleed => "bleed",
            DamageKind::Poison => "poison",
            DamageKind::GasCloud => "gas_cloud",
            DamageKind::Blast => "blast",
        }
    }

    /// Effect damage never re-enters the pipeline
    pub fn is_effect(&self) -> bool {
        !matches!(self, DamageKind::Attack)
    }
}

impl fmt::Display for DamageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source attached to every damage callback
///
/// `guarded` marks damage that must not dispatch element triggers. Effect
/// damage is always guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    pub kind: DamageKind,
    pub attacker: Option<EntityId>,
    guarded: bool,
}

impl DamageSource {
    /// An unguarded weapon hit
    pub fn attack(attacker: Option<EntityId>) -> Self {
        DamageSource {
            kind: DamageKind::Attack,
            attacker,
            guarded: false,
        }
    }

    /// A guarded hit dealt by a status effect
    pub fn effect(kind: DamageKind, attacker: Option<EntityId>) -> Self {
        DamageSource {
            kind,
            attacker,
            guarded: true,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.guarded
    }
}
