use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Sentinel tokens treated as "missing" in supplier free text (spec §4.4).
pub const MISSING_SENTINELS: [&str; 5] = ["tbd", "n/a", "na", "-", ""];

pub fn is_missing_sentinel(raw: &str) -> bool {
    MISSING_SENTINELS.contains(&raw.trim().to_lowercase().as_str())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionsCm {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl DimensionsCm {
    pub fn is_empty(&self) -> bool {
        self.length.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Structured characteristics an extractor contributes (spec §4.4). Every
/// field is independently optional; out-of-range values are dropped, not
/// clamped, so a bogus reading never silently becomes a plausible one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    pub voltage: Option<i64>,
    pub power_watts: Option<i64>,
    pub weight_kg: Option<f64>,
    pub dimensions_cm: DimensionsCm,
    pub storage_gb: Option<i64>,
    pub memory_gb: Option<i64>,
}

impl ExtractedFeatures {
    pub fn has_any_features(&self) -> bool {
        self.voltage.is_some()
            || self.power_watts.is_some()
            || self.weight_kg.is_some()
            || !self.dimensions_cm.is_empty()
            || self.storage_gb.is_some()
            || self.memory_gb.is_some()
    }

    /// Flattens non-`None` fields into a merge-ready characteristics map
    /// (spec §4.4 "merge results into a single characteristics map").
    pub fn to_characteristics(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        if let Some(v) = self.voltage {
            map.insert("voltage".to_string(), JsonValue::from(v));
        }
        if let Some(v) = self.power_watts {
            map.insert("power_watts".to_string(), JsonValue::from(v));
        }
        if let Some(v) = self.weight_kg {
            map.insert("weight_kg".to_string(), JsonValue::from(v));
        }
        if !self.dimensions_cm.is_empty() {
            let mut dims = Map::new();
            if let Some(v) = self.dimensions_cm.length {
                dims.insert("length".to_string(), JsonValue::from(v));
            }
            if let Some(v) = self.dimensions_cm.width {
                dims.insert("width".to_string(), JsonValue::from(v));
            }
            if let Some(v) = self.dimensions_cm.height {
                dims.insert("height".to_string(), JsonValue::from(v));
            }
            map.insert("dimensions_cm".to_string(), JsonValue::Object(dims));
        }
        if let Some(v) = self.storage_gb {
            map.insert("storage_gb".to_string(), JsonValue::from(v));
        }
        if let Some(v) = self.memory_gb {
            map.insert("memory_gb".to_string(), JsonValue::from(v));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_case_and_whitespace_insensitive() {
        assert!(is_missing_sentinel(" N/A "));
        assert!(is_missing_sentinel(""));
        assert!(!is_missing_sentinel("12"));
    }

    #[test]
    fn empty_features_produce_empty_map() {
        assert!(ExtractedFeatures::default().to_characteristics().is_empty());
        assert!(!ExtractedFeatures::default().has_any_features());
    }

    #[test]
    fn populated_features_flatten_dimensions_as_nested_object() {
        let features = ExtractedFeatures {
            dimensions_cm: DimensionsCm { length: Some(10.0), width: None, height: Some(5.0) },
            ..Default::default()
        };
        let map = features.to_characteristics();
        assert!(map.contains_key("dimensions_cm"));
        assert!(!map.contains_key("voltage"));
    }
}
