//! Concrete rule-based extractors (spec §4.4): electronics (voltage/power/
//! weight), physical dimensions, and storage/memory capacity. Each owns a
//! disjoint set of characteristic keys.

use once_cell::sync::Lazy;
use regex::Regex;

use super::extractor::FeatureExtractor;
use super::types::{is_missing_sentinel, DimensionsCm, ExtractedFeatures};

fn parse_bounded_int(raw: &str, min: i64, max: i64) -> Option<i64> {
    if is_missing_sentinel(raw) {
        return None;
    }
    let value: i64 = raw.parse().ok()?;
    (min..=max).contains(&value).then_some(value)
}

fn parse_bounded_float(raw: &str, min: f64, max: f64) -> Option<f64> {
    if is_missing_sentinel(raw) {
        return None;
    }
    let value: f64 = raw.parse().ok()?;
    (min..=max).contains(&value).then_some(value)
}

static VOLTAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*v\b").unwrap());
static POWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*w(?:att)?s?\b").unwrap());
static WEIGHT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*kg\b").unwrap());

pub struct ElectronicsExtractor;

impl FeatureExtractor for ElectronicsExtractor {
    fn name(&self) -> &'static str {
        "electronics"
    }

    fn extract(&self, text: &str) -> ExtractedFeatures {
        let voltage = VOLTAGE_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_bounded_int(&m.as_str().split('.').next().unwrap_or(m.as_str()).to_string(), 0, 10_000));
        let power_watts = POWER_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_bounded_int(&m.as_str().split('.').next().unwrap_or(m.as_str()).to_string(), 0, 100_000));
        let weight_kg = WEIGHT_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_bounded_float(m.as_str(), 0.0, 10_000.0));

        ExtractedFeatures { voltage, power_watts, weight_kg, ..Default::default() }
    }
}

static DIMENSIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*[x×]\s*(\d+(?:\.\d+)?)\s*[x×]\s*(\d+(?:\.\d+)?)\s*cm\b").unwrap()
});

pub struct DimensionsExtractor;

impl FeatureExtractor for DimensionsExtractor {
    fn name(&self) -> &'static str {
        "dimensions"
    }

    fn extract(&self, text: &str) -> ExtractedFeatures {
        let Some(caps) = DIMENSIONS_RE.captures(text) else {
            return ExtractedFeatures::default();
        };
        let bound = |m: &str| parse_bounded_float(m, 0.0, 100_000.0);
        let length = caps.get(1).and_then(|m| bound(m.as_str()));
        let width = caps.get(2).and_then(|m| bound(m.as_str()));
        let height = caps.get(3).and_then(|m| bound(m.as_str()));

        ExtractedFeatures { dimensions_cm: DimensionsCm { length, width, height }, ..Default::default() }
    }
}

static STORAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*gb\b(?:\s*(ssd|hdd|storage|rom))?").unwrap());
static MEMORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*gb\b\s*(ram|memory)").unwrap());

/// Disambiguates "128GB" (storage) from "8GB RAM" (memory) by the keyword
/// immediately following the number; a bare "GB" with no qualifier is
/// treated as storage, matching the common supplier-sheet convention.
pub struct StorageExtractor;

impl FeatureExtractor for StorageExtractor {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn extract(&self, text: &str) -> ExtractedFeatures {
        let memory_gb = MEMORY_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_bounded_int(m.as_str(), 0, 1_000));

        let storage_gb = STORAGE_RE.captures(text).and_then(|c| {
            let qualifier = c.get(2).map(|m| m.as_str().to_lowercase());
            if qualifier.as_deref() == Some("ram") {
                None
            } else {
                c.get(1).and_then(|m| parse_bounded_int(m.as_str(), 0, 100_000))
            }
        });

        ExtractedFeatures { storage_gb, memory_gb, ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn electronics_extractor_reads_voltage_power_and_weight() {
        let features = ElectronicsExtractor.extract("Runs at 220V, 1500W, weighs 2.5kg");
        assert_eq!(features.voltage, Some(220));
        assert_eq!(features.power_watts, Some(1500));
        assert_eq!(features.weight_kg, Some(2.5));
    }

    #[test]
    fn electronics_extractor_rejects_out_of_range_voltage() {
        let features = ElectronicsExtractor.extract("Runs at 99999V");
        assert_eq!(features.voltage, None);
    }

    #[test]
    fn dimensions_extractor_reads_l_w_h() {
        let features = DimensionsExtractor.extract("Size: 10x20x30 cm");
        assert_eq!(features.dimensions_cm.length, Some(10.0));
        assert_eq!(features.dimensions_cm.width, Some(20.0));
        assert_eq!(features.dimensions_cm.height, Some(30.0));
    }

    #[test]
    fn storage_extractor_distinguishes_storage_from_memory() {
        let features = StorageExtractor.extract("128GB storage, 8GB RAM");
        assert_eq!(features.storage_gb, Some(128));
        assert_eq!(features.memory_gb, Some(8));
    }

    #[test]
    fn storage_extractor_treats_bare_gb_as_storage() {
        let features = StorageExtractor.extract("256GB model");
        assert_eq!(features.storage_gb, Some(256));
        assert_eq!(features.memory_gb, None);
    }

    #[test]
    fn missing_sentinel_text_yields_no_features() {
        let features = ElectronicsExtractor.extract("n/a");
        assert!(!features.has_any_features());
    }
}
