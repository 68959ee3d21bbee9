//! Armor modifiers - multiply-base adjustments owned by status effects

use super::EffectFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of one applied modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierId(pub u64);

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mod-{}", self.0)
    }
}

/// A multiply-base armor modifier: contributes `amount` to `(1 + Σ amount)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorModifier {
    pub id: ModifierId,
    pub family: EffectFamily,
    /// Signed fraction of base armor, e.g. -0.5
    pub amount: f64,
}

/// Modifiers applied to one combatant's armor
///
/// Final value is `base × max(0, 1 + Σ amount)`; multiply-base modifiers
/// stack additively with each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierSet {
    modifiers: Vec<ArmorModifier>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a modifier; an existing modifier with the same id is replaced
    pub fn add(&mut self, modifier: ArmorModifier) {
        self.remove(modifier.id);
        self.modifiers.push(modifier);
    }

    /// Remove a modifier by id; false if it wasn't present
    pub fn remove(&mut self, id: ModifierId) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.id != id);
        self.modifiers.len() != before
    }

    /// Remove every modifier owned by a family
    pub fn remove_family(&mut self, family: EffectFamily) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.family != family);
        before - self.modifiers.len()
    }

    pub fn contains(&self, id: ModifierId) -> bool {
        self.modifiers.iter().any(|m| m.id == id)
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArmorModifier> {
        self.modifiers.iter()
    }

    /// Get the total multiplier, never negative
    pub fn total_multiplier(&self) -> f64 {
        let sum: f64 = self.modifiers.iter().map(|m| m.amount).sum();
        (1.0 + sum).max(0.0)
    }

    /// Calculate final value: base × total multiplier
    pub fn apply(&self, base: f64) -> f64 {
        base * self.total_multiplier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(id: u64, family: EffectFamily, amount: f64) -> ArmorModifier {
        ArmorModifier {
            id: ModifierId(id),
            family,
            amount,
        }
    }

    #[test]
    fn test_empty_set() {
        let set = ModifierSet::new();
        assert!((set.apply(500.0) - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modifiers_stack_additively() {
        let mut set = ModifierSet::new();
        set.add(modifier(1, EffectFamily::Heat, -0.5));
        set.add(modifier(2, EffectFamily::Corrosive, -0.26));
        // 500 * (1 - 0.76), not 500 * 0.5 * 0.74
        assert!((set.apply(500.0) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_at_zero() {
        let mut set = ModifierSet::new();
        set.add(modifier(1, EffectFamily::Heat, -0.5));
        set.add(modifier(2, EffectFamily::Corrosive, -0.8));
        assert!((set.apply(500.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_by_id() {
        let mut set = ModifierSet::new();
        set.add(modifier(1, EffectFamily::Corrosive, -0.26));
        set.add(modifier(2, EffectFamily::Corrosive, -0.32));

        assert!(set.remove(ModifierId(1)));
        assert!(!set.remove(ModifierId(1)));
        assert_eq!(set.len(), 1);
        assert!((set.total_multiplier() - 0.68).abs() < 1e-9);
    }

    #[test]
    fn test_same_id_replaces() {
        let mut set = ModifierSet::new();
        set.add(modifier(7, EffectFamily::Heat, -0.5));
        set.add(modifier(7, EffectFamily::Heat, -0.25));
        assert_eq!(set.len(), 1);
        assert!((set.total_multiplier() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_family() {
        let mut set = ModifierSet::new();
        set.add(modifier(1, EffectFamily::Heat, -0.5));
        set.add(modifier(2, EffectFamily::Corrosive, -0.26));
        set.add(modifier(3, EffectFamily::Corrosive, -0.26));
        assert_eq!(set.remove_family(EffectFamily::Corrosive), 2);
        assert!(set.contains(ModifierId(1)));
    }
}
