//! Element taxonomy and the combination table

mod combination;

pub use combination::{resolve_usage, UsageLayer};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Well-known element and attribute names
pub mod names {
    pub const HEAT: &str = "heat";
    pub const COLD: &str = "cold";
    pub const ELECTRICITY: &str = "electricity";
    pub const TOXIN: &str = "toxin";

    pub const SLASH: &str = "slash";
    pub const PUNCTURE: &str = "puncture";
    pub const IMPACT: &str = "impact";

    pub const BLAST: &str = "blast";
    pub const CORROSIVE: &str = "corrosive";
    pub const GAS: &str = "gas";
    pub const MAGNETIC: &str = "magnetic";
    pub const RADIATION: &str = "radiation";
    pub const VIRAL: &str = "viral";

    pub const CRITICAL_CHANCE: &str = "critical_chance";
    pub const CRITICAL_DAMAGE: &str = "critical_damage";
    pub const TRIGGER_CHANCE: &str = "trigger_chance";

    pub const PHYSICAL: [&str; 3] = [SLASH, PUNCTURE, IMPACT];
    pub const SPECIAL_ATTRIBUTES: [&str; 3] = [CRITICAL_CHANCE, CRITICAL_DAMAGE, TRIGGER_CHANCE];

    /// Special attributes never count as damage elements
    pub fn is_special_attribute(name: &str) -> bool {
        SPECIAL_ATTRIBUTES.contains(&name)
    }

    pub fn is_physical(name: &str) -> bool {
        PHYSICAL.contains(&name)
    }
}

/// Element category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Physical,
    Basic,
    Complex,
    Special,
    TriggerChance,
    Faction,
}

impl ElementCategory {
    /// Only basic elements take part in combination
    pub fn combines(&self) -> bool {
        matches!(self, ElementCategory::Basic)
    }

    /// Whether values of this category contribute to the element multiplier
    pub fn is_damage(&self) -> bool {
        matches!(
            self,
            ElementCategory::Physical | ElementCategory::Basic | ElementCategory::Complex
        )
    }
}

/// A registered element type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementType {
    /// Lower-case identifier, used as the layer key
    pub name: String,
    /// Display name
    pub display_name: String,
    /// Display color as 0xRRGGBB
    pub color: u32,
    pub category: ElementCategory,
    /// The two basic elements a complex element is formed from
    #[serde(default)]
    pub components: Option<(String, String)>,
}

impl ElementType {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        color: u32,
        category: ElementCategory,
    ) -> Self {
        ElementType {
            name: name.into(),
            display_name: display_name.into(),
            color,
            category,
            components: None,
        }
    }

    /// Create a complex element formed from two basic elements
    pub fn complex(
        name: impl Into<String>,
        display_name: impl Into<String>,
        color: u32,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        ElementType {
            name: name.into(),
            display_name: display_name.into(),
            color,
            category: ElementCategory::Complex,
            components: Some((first.into(), second.into())),
        }
    }
}

/// Element registration error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("element '{0}' is already registered")]
    Duplicate(String),
    #[error("complex element '{0}' must declare two components")]
    MissingComponents(String),
    #[error("complex element '{name}' references '{component}', which is not a registered basic element")]
    InvalidComponent { name: String, component: String },
    #[error("'{first}' and '{second}' already combine into '{existing}'")]
    ConflictingPair {
        first: String,
        second: String,
        existing: String,
    },
}

/// Registry of element types and the combination table derived from them
///
/// Append-only: types can be registered but never removed or replaced.
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    types: Vec<ElementType>,
    index: HashMap<String, usize>,
    /// Unordered component pair -> index of the complex type
    pairs: HashMap<(String, String), usize>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl ElementTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element type
    pub fn register(&mut self, element: ElementType) -> Result<(), ElementError> {
        if self.index.contains_key(&element.name) {
            return Err(ElementError::Duplicate(element.name));
        }

        let mut pair = None;
        if element.category == ElementCategory::Complex {
            let (first, second) = element
                .components
                .as_ref()
                .ok_or_else(|| ElementError::MissingComponents(element.name.clone()))?;
            for component in [first, second] {
                if self.category_of(component) != Some(ElementCategory::Basic) {
                    return Err(ElementError::InvalidComponent {
                        name: element.name.clone(),
                        component: component.clone(),
                    });
                }
            }
            let key = pair_key(first, second);
            if let Some(&existing) = self.pairs.get(&key) {
                return Err(ElementError::ConflictingPair {
                    first: first.clone(),
                    second: second.clone(),
                    existing: self.types[existing].name.clone(),
                });
            }
            pair = Some(key);
        }

        let idx = self.types.len();
        self.index.insert(element.name.clone(), idx);
        if let Some(key) = pair {
            self.pairs.insert(key, idx);
        }
        self.types.push(element);
        Ok(())
    }

    /// Load the built-in element set
    pub fn with_defaults() -> Self {
        use names::*;
        use ElementCategory::*;

        let defaults = [
            ElementType::new(HEAT, "Heat", 0xE8_6A_17, Basic),
            ElementType::new(COLD, "Cold", 0x7F_D4_F5, Basic),
            ElementType::new(ELECTRICITY, "Electricity", 0xB1_8C_F2, Basic),
            ElementType::new(TOXIN, "Toxin", 0x3F_B5_3B, Basic),
            ElementType::new(SLASH, "Slash", 0xC8_C8_C8, Physical),
            ElementType::new(PUNCTURE, "Puncture", 0xA8_A8_A8, Physical),
            ElementType::new(IMPACT, "Impact", 0x88_88_88, Physical),
            ElementType::complex(BLAST, "Blast", 0xF2_A1_3B, HEAT, COLD),
            ElementType::complex(CORROSIVE, "Corrosive", 0xB9_D1_2E, ELECTRICITY, TOXIN),
            ElementType::complex(GAS, "Gas", 0x6F_C7_A0, HEAT, TOXIN),
            ElementType::complex(MAGNETIC, "Magnetic", 0x4C_6E_F5, COLD, ELECTRICITY),
            ElementType::complex(RADIATION, "Radiation", 0xF5_E0_4C, HEAT, ELECTRICITY),
            ElementType::complex(VIRAL, "Viral", 0xC2_3B_6F, COLD, TOXIN),
            ElementType::new(CRITICAL_CHANCE, "Critical Chance", 0xFF_FF_FF, Special),
            ElementType::new(CRITICAL_DAMAGE, "Critical Damage", 0xFF_FF_FF, Special),
            ElementType::new(TRIGGER_CHANCE, "Trigger Chance", 0xFF_FF_FF, TriggerChance),
            ElementType::new("grineer", "Grineer", 0xB5_4A_2C, Faction),
            ElementType::new("corpus", "Corpus", 0x2C_7F_B5, Faction),
            ElementType::new("infested", "Infested", 0x6B_9A_2E, Faction),
            ElementType::new("orokin", "Orokin", 0xD9_C2_6B, Faction),
            ElementType::new("sentient", "Sentient", 0x8E_2C_B5, Faction),
            ElementType::new("murmur", "Murmur", 0x5A_5A_7A, Faction),
        ];

        let mut table = Self::new();
        for element in defaults {
            // Built-in set is consistent, registration cannot fail
            if let Err(e) = table.register(element) {
                tracing::error!(error = %e, "built-in element rejected");
            }
        }
        table
    }

    /// Get an element type by name
    pub fn get(&self, name: &str) -> Option<&ElementType> {
        self.index.get(name).map(|&idx| &self.types[idx])
    }

    /// Get the category of a registered element
    pub fn category_of(&self, name: &str) -> Option<ElementCategory> {
        self.get(name).map(|e| e.category)
    }

    /// Look up the complex element formed by two basic elements (order-independent)
    pub fn combine(&self, a: &str, b: &str) -> Option<&ElementType> {
        self.pairs.get(&pair_key(a, b)).map(|&idx| &self.types[idx])
    }

    /// Order in which elements are considered for combination:
    /// basic types first, then physical types, each in registration order
    pub fn priority_order(&self) -> Vec<&str> {
        let basic = self
            .types
            .iter()
            .filter(|e| e.category == ElementCategory::Basic);
        let physical = self
            .types
            .iter()
            .filter(|e| e.category == ElementCategory::Physical);
        basic.chain(physical).map(|e| e.name.as_str()).collect()
    }

    /// Iterate all element types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ElementType> {
        self.types.iter()
    }

    /// Iterate element types of one category
    pub fn of_category(&self, category: ElementCategory) -> impl Iterator<Item = &ElementType> {
        self.types.iter().filter(move |e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority_order() {
        let table = ElementTable::with_defaults();
        assert_eq!(
            table.priority_order(),
            vec!["heat", "cold", "electricity", "toxin", "slash", "puncture", "impact"]
        );
    }

    #[test]
    fn test_combine_is_unordered() {
        let table = ElementTable::with_defaults();
        assert_eq!(table.combine("heat", "cold").unwrap().name, "blast");
        assert_eq!(table.combine("cold", "heat").unwrap().name, "blast");
        assert_eq!(table.combine("toxin", "electricity").unwrap().name, "corrosive");
        assert_eq!(table.combine("heat", "toxin").unwrap().name, "gas");
        assert_eq!(table.combine("cold", "electricity").unwrap().name, "magnetic");
        assert_eq!(table.combine("heat", "electricity").unwrap().name, "radiation");
        assert_eq!(table.combine("cold", "toxin").unwrap().name, "viral");
        assert!(table.combine("heat", "slash").is_none());
        assert!(table.combine("heat", "heat").is_none());
    }

    #[test]
    fn test_categories() {
        let table = ElementTable::with_defaults();
        assert_eq!(table.category_of("slash"), Some(ElementCategory::Physical));
        assert_eq!(table.category_of("trigger_chance"), Some(ElementCategory::TriggerChance));
        assert_eq!(table.category_of("grineer"), Some(ElementCategory::Faction));
        assert_eq!(table.category_of("unknown"), None);
        assert_eq!(table.of_category(ElementCategory::Complex).count(), 6);
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let mut table = ElementTable::with_defaults();
        let before = table.len();
        let err = table
            .register(ElementType::new("heat", "Heat", 0, ElementCategory::Basic))
            .unwrap_err();
        assert_eq!(err, ElementError::Duplicate("heat".to_string()));
        assert_eq!(table.len(), before);
    }

    #[test]
    fn test_register_complex_requires_basic_components() {
        let mut table = ElementTable::with_defaults();
        let err = table
            .register(ElementType::complex("shrapnel", "Shrapnel", 0, "slash", "heat"))
            .unwrap_err();
        assert!(matches!(err, ElementError::InvalidComponent { .. }));

        let mut missing = ElementType::new("void", "Void", 0, ElementCategory::Complex);
        missing.components = None;
        assert_eq!(
            table.register(missing).unwrap_err(),
            ElementError::MissingComponents("void".to_string())
        );
    }

    #[test]
    fn test_register_conflicting_pair_rejected() {
        let mut table = ElementTable::with_defaults();
        let err = table
            .register(ElementType::complex("steam", "Steam", 0, "cold", "heat"))
            .unwrap_err();
        assert!(matches!(err, ElementError::ConflictingPair { ref existing, .. } if existing == "blast"));
    }

    #[test]
    fn test_register_new_basic_extends_priority() {
        let mut table = ElementTable::with_defaults();
        table
            .register(ElementType::new("void", "Void", 0, ElementCategory::Basic))
            .unwrap();
        table
            .register(ElementType::complex("tau", "Tau", 0, "void", "heat"))
            .unwrap();

        let order = table.priority_order();
        // New basic types slot in after the built-in basics, before physical
        assert_eq!(order[4], "void");
        assert_eq!(order[5], "slash");
        assert_eq!(table.combine("heat", "void").unwrap().name, "tau");
    }
}
