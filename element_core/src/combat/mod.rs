//! Combat resolution - the simulation context and weapon attacks

mod resolution;
mod result;

pub use resolution::{attack, attack_with_draw};
pub use result::AttackOutcome;

use crate::config::GameConstants;
use crate::damage::DamagePipeline;
use crate::effect::EffectRegistry;
use crate::element::ElementTable;

/// Everything an attack needs besides the world: element table, damage
/// pipeline and the status effect registry
#[derive(Debug, Clone)]
pub struct CombatContext {
    pub elements: ElementTable,
    pub pipeline: DamagePipeline,
    pub effects: EffectRegistry,
}

impl CombatContext {
    pub fn new(constants: &GameConstants) -> Self {
        CombatContext {
            elements: ElementTable::with_defaults(),
            pipeline: DamagePipeline::new(constants.armor.clone()),
            effects: EffectRegistry::new(constants),
        }
    }
}

impl Default for CombatContext {
    fn default() -> Self {
        Self::new(&GameConstants::default())
    }
}
