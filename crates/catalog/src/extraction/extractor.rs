use super::types::ExtractedFeatures;

/// An independent extractor over disjoint characteristic keys (spec §4.4):
/// running any two together never produces a conflicting write.
pub trait FeatureExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> ExtractedFeatures;
}

/// Runs every registered extractor and merges their disjoint contributions.
/// Idempotent: re-running on the same text and extractor set reproduces the
/// same output (spec §4.4, §8).
pub fn extract_all_features(text: &str, extractors: &[Box<dyn FeatureExtractor>]) -> ExtractedFeatures {
    let mut merged = ExtractedFeatures::default();
    for extractor in extractors {
        let partial = extractor.extract(text);
        if partial.voltage.is_some() {
            merged.voltage = partial.voltage;
        }
        if partial.power_watts.is_some() {
            merged.power_watts = partial.power_watts;
        }
        if partial.weight_kg.is_some() {
            merged.weight_kg = partial.weight_kg;
        }
        if !partial.dimensions_cm.is_empty() {
            merged.dimensions_cm = partial.dimensions_cm;
        }
        if partial.storage_gb.is_some() {
            merged.storage_gb = partial.storage_gb;
        }
        if partial.memory_gb.is_some() {
            merged.memory_gb = partial.memory_gb;
        }
    }
    merged
}
