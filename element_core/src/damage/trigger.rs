//! Trigger dispatch - which status effects a hit starts

use crate::effect::MAX_LEVEL;
use crate::element::{names, UsageLayer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status effect family reacting to an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerFamily {
    Heat,
    Bleed,
    Poison,
    Blast,
    Gas,
    Corrosive,
    /// Resets the target's shield regeneration
    Magnetic,
}

impl TriggerFamily {
    /// Family started by an element, if any
    pub fn for_element(element: &str) -> Option<TriggerFamily> {
        match element {
            names::HEAT => Some(TriggerFamily::Heat),
            names::SLASH => Some(TriggerFamily::Bleed),
            names::TOXIN => Some(TriggerFamily::Poison),
            names::BLAST => Some(TriggerFamily::Blast),
            names::GAS => Some(TriggerFamily::Gas),
            names::CORROSIVE => Some(TriggerFamily::Corrosive),
            names::MAGNETIC => Some(TriggerFamily::Magnetic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TriggerFamily::Heat => "heat",
            TriggerFamily::Bleed => "bleed",
            TriggerFamily::Poison => "poison",
            TriggerFamily::Blast => "blast",
            TriggerFamily::Gas => "gas",
            TriggerFamily::Corrosive => "corrosive",
            TriggerFamily::Magnetic => "magnetic",
        }
    }
}

impl fmt::Display for TriggerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `clamp(floor(value) - 1, 0, MAX_LEVEL - 1)`
pub fn amplifier_for_value(value: f64) -> u32 {
    if !value.is_finite() || value < 2.0 {
        return 0;
    }
    let level = value.floor() - 1.0;
    (level as u32).min(MAX_LEVEL - 1)
}

/// One effect to start on the target of a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRequest {
    pub family: TriggerFamily,
    pub element: String,
    pub amplifier: u32,
}

/// Effects started by a hit that dealt `final_damage`
///
/// One request per Usage element that maps to a family. A hit that dealt no
/// damage starts nothing.
pub fn trigger_requests(usage: &UsageLayer, final_damage: f64) -> Vec<TriggerRequest> {
    if final_damage <= 0.0 {
        return Vec::new();
    }

    usage
        .iter()
        .filter(|(_, value)| *value > 0.0)
        .filter_map(|(element, value)| {
            TriggerFamily::for_element(element).map(|family| TriggerRequest {
                family,
                element: element.to_string(),
                amplifier: amplifier_for_value(value),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplifier_for_value() {
        assert_eq!(amplifier_for_value(0.5), 0);
        assert_eq!(amplifier_for_value(1.0), 0);
        assert_eq!(amplifier_for_value(1.9), 0);
        assert_eq!(amplifier_for_value(2.0), 1);
        assert_eq!(amplifier_for_value(4.7), 3);
        assert_eq!(amplifier_for_value(10.0), 9);
        assert_eq!(amplifier_for_value(55.0), 9);
        assert_eq!(amplifier_for_value(f64::NAN), 0);
    }

    #[test]
    fn test_family_mapping() {
        assert_eq!(TriggerFamily::for_element("slash"), Some(TriggerFamily::Bleed));
        assert_eq!(TriggerFamily::for_element("toxin"), Some(TriggerFamily::Poison));
        assert_eq!(TriggerFamily::for_element("magnetic"), Some(TriggerFamily::Magnetic));
        for inert in ["cold", "electricity", "puncture", "impact", "radiation", "viral"] {
            assert_eq!(TriggerFamily::for_element(inert), None);
        }
    }

    #[test]
    fn test_requests_from_usage() {
        let usage = UsageLayer::from_values([
            ("blast", 4.0),
            ("slash", 1.0),
            ("impact", 3.0),
            ("critical_chance", 0.5),
        ]);

        let requests = trigger_requests(&usage, 40.0);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].family, TriggerFamily::Blast);
        assert_eq!(requests[0].amplifier, 3);
        assert_eq!(requests[1].family, TriggerFamily::Bleed);
        assert_eq!(requests[1].amplifier, 0);
    }

    #[test]
    fn test_no_damage_no_triggers() {
        let usage = UsageLayer::from_values([("heat", 3.0)]);
        assert!(trigger_requests(&usage, 0.0).is_empty());
    }
}
