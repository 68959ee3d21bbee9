//! Persisted tag documents for WeaponElementData
//!
//! Layout:
//!
//! ```json
//! { "basic":    { "heat": 2.0 },
//!   "computed": { "heat": { "operation": "add", "value": 1.0 } },
//!   "usage":    { "blast": 4.0 },
//!   "extra":    { "grineer": { "operation": "add", "value": 0.25 } } }
//! ```
//!
//! Missing layers load as empty. A stored `usage` layer becomes the cached
//! Usage until the next Basic/Computed mutation.

use super::{Correction, ExtraLayer, WeaponElementData};
use crate::element::UsageLayer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Tag document error
#[derive(Error, Debug)]
pub enum TagError {
    #[error("tag document must be an object, found {0}")]
    NotAnObject(&'static str),
    #[error("malformed tag document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// On-disk shape of the four layers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PersistedLayers {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    basic: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    computed: BTreeMap<String, Correction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage: Option<UsageLayer>,
    #[serde(default, skip_serializing_if = "ExtraLayer::is_empty")]
    extra: ExtraLayer,
}

impl From<PersistedLayers> for WeaponElementData {
    fn from(layers: PersistedLayers) -> Self {
        WeaponElementData {
            basic: lowercase_keys(layers.basic),
            computed: lowercase_keys(layers.computed),
            extra: layers.extra,
            usage: layers.usage,
        }
    }
}

impl From<WeaponElementData> for PersistedLayers {
    fn from(data: WeaponElementData) -> Self {
        PersistedLayers {
            basic: data.basic,
            computed: data.computed,
            usage: data.usage,
            extra: data.extra,
        }
    }
}

fn lowercase_keys<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
    map.into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl WeaponElementData {
    /// Write all layers into a tag document
    pub fn to_tags(&self) -> Result<Value, TagError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read layers from a tag document
    pub fn from_tags(tags: &Value) -> Result<Self, TagError> {
        if !tags.is_object() {
            return Err(TagError::NotAnObject(kind_of(tags)));
        }
        Ok(serde_json::from_value(tags.clone())?)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, TagError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TagError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_tags(&value)
    }
}
