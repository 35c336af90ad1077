use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::feature_collection::FeatureCollection;

pub const DEFAULT_ATTRIBUTE_TO_LOG: &str = "OBJECTID";

/// Options for auditing which features a query returned.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditConfig {
    /// Attribute whose value identifies a feature in the audit trail.
    pub attribute_to_log: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            attribute_to_log: DEFAULT_ATTRIBUTE_TO_LOG.to_string(),
        }
    }
}

fn display_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl FeatureCollection {
    /// Values of `attribute` across all features, in feature order. Features
    /// without the attribute, or with a null value, are skipped.
    pub fn attribute_values(&self, attribute: &str) -> Vec<String> {
        self.features
            .iter()
            .filter_map(|feature| feature.properties.get(attribute))
            .filter_map(display_value)
            .collect()
    }
}

/// Collect the configured attribute from every decoded feature.
pub fn collect_audit_values(collection: &FeatureCollection, config: &AuditConfig) -> Vec<String> {
    collection.attribute_values(&config.attribute_to_log)
}
