//! Computed and Extra layer entries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Operation of a Computed-layer correction
///
/// Unrecognized operation strings are kept verbatim so a tag document
/// survives a load/save cycle unchanged; they are skipped when resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CorrectionOp {
    Add,
    Sub,
    Mul,
    Div,
    Unknown(String),
}

impl CorrectionOp {
    pub fn as_str(&self) -> &str {
        match self {
            CorrectionOp::Add => "add",
            CorrectionOp::Sub => "sub",
            CorrectionOp::Mul => "mul",
            CorrectionOp::Div => "div",
            CorrectionOp::Unknown(op) => op,
        }
    }
}

impl From<String> for CorrectionOp {
    fn from(s: String) -> Self {
        match s.as_str() {
            "add" => CorrectionOp::Add,
            "sub" => CorrectionOp::Sub,
            "mul" => CorrectionOp::Mul,
            "div" => CorrectionOp::Div,
            _ => CorrectionOp::Unknown(s),
        }
    }
}

impl From<&str> for CorrectionOp {
    fn from(s: &str) -> Self {
        CorrectionOp::from(s.to_string())
    }
}

impl From<CorrectionOp> for String {
    fn from(op: CorrectionOp) -> Self {
        match op {
            CorrectionOp::Unknown(op) => op,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CorrectionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A correction applied on top of a Basic-layer value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub operation: CorrectionOp,
    pub value: f64,
}

impl Correction {
    pub fn new(operation: impl Into<CorrectionOp>, value: f64) -> Self {
        Correction {
            operation: operation.into(),
            value,
        }
    }

    pub fn add(value: f64) -> Self {
        Self::new(CorrectionOp::Add, value)
    }

    pub fn sub(value: f64) -> Self {
        Self::new(CorrectionOp::Sub, value)
    }

    pub fn mul(value: f64) -> Self {
        Self::new(CorrectionOp::Mul, value)
    }

    pub fn div(value: f64) -> Self {
        Self::new(CorrectionOp::Div, value)
    }

    /// Apply to `base`; corrections that cannot be applied leave it unchanged
    pub fn apply(&self, element: &str, base: f64) -> f64 {
        match &self.operation {
            CorrectionOp::Add => base + self.value,
            CorrectionOp::Sub => base - self.value,
            CorrectionOp::Mul => base * self.value,
            CorrectionOp::Div if self.value == 0.0 => {
                tracing::warn!(element = %element, "skipping correction dividing by zero");
                base
            }
            CorrectionOp::Div => base / self.value,
            CorrectionOp::Unknown(op) => {
                tracing::warn!(element = %element, operation = %op, "skipping correction with unknown operation");
                base
            }
        }
    }
}

/// Operation of a faction bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionOp {
    Add,
    Sub,
}

/// Per-faction damage bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactionBonus {
    pub operation: FactionOp,
    pub value: f64,
}

impl FactionBonus {
    pub fn add(value: f64) -> Self {
        FactionBonus {
            operation: FactionOp::Add,
            value,
        }
    }

    pub fn sub(value: f64) -> Self {
        FactionBonus {
            operation: FactionOp::Sub,
            value,
        }
    }

    /// The bonus as a signed additive modifier
    pub fn signed_value(&self) -> f64 {
        match self.operation {
            FactionOp::Add => self.value,
            FactionOp::Sub => -self.value,
        }
    }
}

/// Extra layer: faction damage bonuses, orthogonal to elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraLayer {
    bonuses: BTreeMap<String, FactionBonus>,
}

impl ExtraLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bonus for a faction; names are stored lower-case
    pub fn set(&mut self, faction: &str, bonus: FactionBonus) {
        self.bonuses.insert(faction.to_ascii_lowercase(), bonus);
    }

    pub fn remove(&mut self, faction: &str) -> Option<FactionBonus> {
        let key = self
            .bonuses
            .keys()
            .find(|k| k.eq_ignore_ascii_case(faction))
            .cloned()?;
        self.bonuses.remove(&key)
    }

    pub fn get(&self, faction: &str) -> Option<&FactionBonus> {
        self.bonuses
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(faction))
            .map(|(_, bonus)| bonus)
    }

    /// Additive damage modifier against a faction (case-insensitive), 0 if absent
    pub fn faction_modifier(&self, faction: &str) -> f64 {
        self.get(faction).map(FactionBonus::signed_value).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactionBonus)> {
        self.bonuses.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }
}
