//! Element combination - folding resolved basic elements into the Usage layer

use super::{names, ElementCategory, ElementTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved, ready-to-consume element values
///
/// Holds surviving basic and physical elements, complex elements (formed or
/// authored) and the special attributes. Values are always positive: absent
/// and non-positive entries are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageLayer {
    values: BTreeMap<String, f64>,
}

impl UsageLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layer from raw pairs, dropping non-positive values
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut layer = Self::new();
        for (name, value) in values {
            layer.add(name.into(), value);
        }
        layer
    }

    /// Value of an element, 0 if absent
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Add to an entry, creating it if needed
    fn add(&mut self, name: String, value: f64) {
        if value > 0.0 {
            *self.values.entry(name).or_insert(0.0) += value;
        }
    }

    /// Sum of every value except the special attributes
    pub fn element_sum(&self) -> f64 {
        self.iter()
            .filter(|(name, _)| !names::is_special_attribute(name))
            .map(|(_, v)| v)
            .sum()
    }

    /// Sum of slash, puncture and impact
    pub fn physical_sum(&self) -> f64 {
        names::PHYSICAL.iter().map(|name| self.get(name)).sum()
    }

    pub fn critical_chance(&self) -> f64 {
        self.get(names::CRITICAL_CHANCE)
    }

    /// Critical damage multiplier; a missing value means crits add nothing
    pub fn critical_damage(&self) -> f64 {
        self.values
            .get(names::CRITICAL_DAMAGE)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn trigger_chance(&self) -> f64 {
        self.get(names::TRIGGER_CHANCE)
    }
}

/// Fold resolved Basic+Computed values into a Usage layer
///
/// Elements are visited in the table's priority order. Each unconsumed
/// element with a positive value pairs with the first later unconsumed
/// element it forms a complex type with; both are consumed and the complex
/// type receives the sum of their values. Elements without a partner pass
/// through as themselves. Physical types never combine.
///
/// Complex types authored directly and the special attributes pass through.
/// Faction entries and names the table does not know are ignored.
pub fn resolve_usage(resolved: &BTreeMap<String, f64>, table: &ElementTable) -> UsageLayer {
    let mut usage = UsageLayer::new();
    let order = table.priority_order();
    let value_of = |name: &str| resolved.get(name).copied().filter(|v| *v > 0.0);

    let mut consumed = vec![false; order.len()];
    for i in 0..order.len() {
        if consumed[i] {
            continue;
        }
        let Some(value) = value_of(order[i]) else {
            continue;
        };

        let mut partner = None;
        if table.category_of(order[i]).is_some_and(|c| c.combines()) {
            for j in (i + 1)..order.len() {
                if consumed[j] {
                    continue;
                }
                let Some(other) = value_of(order[j]) else {
                    continue;
                };
                if let Some(compound) = table.combine(order[i], order[j]) {
                    partner = Some((j, other, compound.name.clone()));
                    break;
                }
            }
        }

        match partner {
            Some((j, other, compound)) => {
                consumed[i] = true;
                consumed[j] = true;
                usage.add(compound, value + other);
            }
            None => usage.add(order[i].to_string(), value),
        }
    }

    for (name, &value) in resolved {
        match table.category_of(name) {
            Some(ElementCategory::Complex)
            | Some(ElementCategory::Special)
            | Some(ElementCategory::TriggerChance) => usage.add(name.clone(), value),
            Some(_) => {}
            None => tracing::debug!(element = %name, "ignoring unregistered element"),
        }
    }

    usage
}
