//! WeaponElementData - the layered element model attached to one item

mod layers;
mod tags;

pub use layers::{Correction, CorrectionOp, ExtraLayer, FactionBonus, FactionOp};
pub use tags::TagError;

use crate::element::{names, resolve_usage, ElementTable, UsageLayer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Element data of a single item instance
///
/// Four layers, each keyed by element name:
/// - Basic: author-assigned values
/// - Computed: corrections applied on top of Basic
/// - Usage: the resolved layer consumed by the damage pipeline, cached
/// - Extra: per-faction damage bonuses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "tags::PersistedLayers", into = "tags::PersistedLayers")]
pub struct WeaponElementData {
    basic: BTreeMap<String, f64>,
    computed: BTreeMap<String, Correction>,
    extra: ExtraLayer,
    /// Cached Usage layer; `None` means it must be recomputed
    usage: Option<UsageLayer>,
}

/// Clamp a resolved attribute into its valid range
fn clamp_attribute(name: &str, value: f64) -> f64 {
    match name {
        names::CRITICAL_CHANCE | names::TRIGGER_CHANCE => value.clamp(0.0, 1.0),
        _ => value.max(0.0),
    }
}

impl WeaponElementData {
    /// Create element data with no layers
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a Basic-layer value
    pub fn with_basic(mut self, element: &str, value: f64) -> Self {
        self.set_basic(element, value);
        self
    }

    /// Set a Computed-layer correction
    pub fn with_correction(mut self, element: &str, correction: Correction) -> Self {
        self.set_correction(element, correction);
        self
    }

    /// Set a faction bonus
    pub fn with_faction_bonus(mut self, faction: &str, bonus: FactionBonus) -> Self {
        self.set_faction_bonus(faction, bonus);
        self
    }

    pub fn set_basic(&mut self, element: &str, value: f64) {
        self.basic.insert(element.to_ascii_lowercase(), value);
        self.usage = None;
    }

    pub fn remove_basic(&mut self, element: &str) -> Option<f64> {
        let removed = self.basic.remove(&element.to_ascii_lowercase());
        if removed.is_some() {
            self.usage = None;
        }
        removed
    }

    pub fn set_correction(&mut self, element: &str, correction: Correction) {
        self.computed.insert(element.to_ascii_lowercase(), correction);
        self.usage = None;
    }

    pub fn remove_correction(&mut self, element: &str) -> Option<Correction> {
        let removed = self.computed.remove(&element.to_ascii_lowercase());
        if removed.is_some() {
            self.usage = None;
        }
        removed
    }

    /// Faction bonuses don't feed the Usage layer, so the cache stays valid
    pub fn set_faction_bonus(&mut self, faction: &str, bonus: FactionBonus) {
        self.extra.set(faction, bonus);
    }

    pub fn remove_faction_bonus(&mut self, faction: &str) -> Option<FactionBonus> {
        self.extra.remove(faction)
    }

    pub fn basic(&self) -> &BTreeMap<String, f64> {
        &self.basic
    }

    pub fn computed(&self) -> &BTreeMap<String, Correction> {
        &self.computed
    }

    pub fn extra(&self) -> &ExtraLayer {
        &self.extra
    }

    /// The cached Usage layer, if it is current
    pub fn cached_usage(&self) -> Option<&UsageLayer> {
        self.usage.as_ref()
    }

    /// Whether the item carries any Basic or Computed entries
    pub fn has_elements(&self) -> bool {
        !self.basic.is_empty() || !self.computed.is_empty()
    }

    /// Drop the cached Usage layer
    pub fn invalidate_usage(&mut self) {
        self.usage = None;
    }

    /// Basic value with its correction applied, clamped into range
    pub fn resolved_value(&self, element: &str) -> f64 {
        let element = element.to_ascii_lowercase();
        let base = self.basic.get(&element).copied().unwrap_or(0.0);
        let value = match self.computed.get(&element) {
            Some(correction) => correction.apply(&element, base),
            None => base,
        };
        clamp_attribute(&element, value)
    }

    /// Every element named in Basic or Computed, resolved
    pub fn resolved_values(&self) -> BTreeMap<String, f64> {
        self.basic
            .keys()
            .chain(self.computed.keys())
            .map(|name| (name.clone(), self.resolved_value(name)))
            .collect()
    }

    /// Compute the Usage layer without touching the cache
    pub fn resolve_usage(&self, table: &ElementTable) -> UsageLayer {
        resolve_usage(&self.resolved_values(), table)
    }

    /// The Usage layer, recomputed only when Basic or Computed changed
    pub fn usage(&mut self, table: &ElementTable) -> &UsageLayer {
        if self.usage.is_none() {
            self.usage = Some(self.resolve_usage(table));
        }
        self.usage.get_or_insert_with(UsageLayer::new)
    }

    /// Additive damage modifier against a faction
    pub fn faction_modifier(&self, faction: &str) -> f64 {
        self.extra.faction_modifier(faction)
    }
}
