//! Scenario files - combatants, a weapon and optional constant overrides

use element_core::config::{self, ConfigError};
use element_core::{CombatantProfile, GameConstants, Position, TagError, WeaponElementData};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Scenario loading error
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid weapon tags: {0}")]
    Weapon(#[from] TagError),
    #[error("scenario has no {0}")]
    Missing(&'static str),
}

/// One combatant to spawn
#[derive(Debug, Clone, Deserialize)]
pub struct CombatantSpec {
    pub name: String,
    #[serde(flatten)]
    pub profile: CombatantProfile,
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default)]
    pub position: Position,
}

fn default_health() -> f64 {
    100.0
}

/// Raw scenario document
#[derive(Debug, Clone, Deserialize)]
struct ScenarioFile {
    name: Option<String>,
    #[serde(default = "default_base_damage")]
    base_damage: f64,
    #[serde(default)]
    constants: GameConstants,
    /// Weapon tag document, same layout as the persisted JSON tags
    weapon: serde_json::Value,
    #[serde(default)]
    combatants: Vec<CombatantSpec>,
}

fn default_base_damage() -> f64 {
    25.0
}

/// A validated scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub base_damage: f64,
    pub constants: GameConstants,
    pub weapon: WeaponElementData,
    pub combatants: Vec<CombatantSpec>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = config::load_toml(path)?;
        Self::from_file(file)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = config::parse_toml(content)?;
        Self::from_file(file)
    }

    fn from_file(file: ScenarioFile) -> Result<Self, ScenarioError> {
        config::validate_constants(&file.constants)?;
        let weapon = WeaponElementData::from_tags(&file.weapon)?;
        if !weapon.has_elements() {
            return Err(ScenarioError::Missing("weapon elements"));
        }
        if !file.combatants.iter().any(|c| !c.profile.is_player) {
            return Err(ScenarioError::Missing("enemy combatants"));
        }

        Ok(Scenario {
            name: file.name.unwrap_or_else(|| "unnamed".to_string()),
            base_damage: file.base_damage,
            constants: file.constants,
            weapon,
            combatants: file.combatants,
        })
    }

    /// Built-in scenario: a heat/cold/toxin rifle against a small Grineer squad
    pub fn builtin() -> Result<Self, ScenarioError> {
        Self::parse(BUILTIN)
    }
}

const BUILTIN: &str = r#"
name = "grineer squad"
base_damage = 25.0

[weapon.basic]
heat = 1.5
cold = 1.0
toxin = 0.8
slash = 0.5
critical_chance = 0.25
critical_damage = 2.0

[weapon.computed]
heat = { operation = "add", value = 0.5 }

[weapon.extra]
grineer = { operation = "add", value = 0.25 }

[[combatants]]
name = "player"
is_player = true
health = 300.0
base_shield = 150.0
position = { x = 0.0, y = 0.0, z = 10.0 }

[[combatants]]
name = "heavy gunner"
level = 30
faction = "grineer"
base_armor = 500.0
health = 2500.0
position = { x = 0.0, y = 0.0, z = 0.0 }

[[combatants]]
name = "lancer"
level = 25
faction = "grineer"
base_armor = 100.0
health = 800.0
position = { x = 1.5, y = 0.0, z = 0.0 }

[[combatants]]
name = "trooper"
level = 25
faction = "grineer"
base_armor = 100.0
health = 800.0
position = { x = 4.0, y = 0.0, z = 1.0 }
"#;
