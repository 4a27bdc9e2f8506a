//! Rule-based feature extractor pipeline (spec §4.4): disjoint-key
//! extractors producing structured characteristics from supplier free text.

pub mod extractor;
pub mod extractors;
pub mod types;

pub use extractor::{extract_all_features, FeatureExtractor};
pub use extractors::{DimensionsExtractor, ElectronicsExtractor, StorageExtractor};
pub use types::{DimensionsCm, ExtractedFeatures};

/// The default extractor set run by the `enrich_item` task.
pub fn default_extractors() -> Vec<Box<dyn FeatureExtractor>> {
    vec![Box::new(ElectronicsExtractor), Box::new(DimensionsExtractor), Box::new(StorageExtractor)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_merges_disjoint_extractor_output() {
        let features = extract_all_features("220V, 1500W, 2.5kg, 10x20x30 cm, 128GB storage, 8GB RAM", &default_extractors());
        assert_eq!(features.voltage, Some(220));
        assert_eq!(features.storage_gb, Some(128));
        assert_eq!(features.memory_gb, Some(8));
        assert_eq!(features.dimensions_cm.length, Some(10.0));
    }

    #[test]
    fn pipeline_is_idempotent() {
        let text = "220V, 1500W, 2.5kg";
        let first = extract_all_features(text, &default_extractors());
        let second = extract_all_features(text, &default_extractors());
        assert_eq!(first, second);
    }
}
