//! `enrich_item` handler (spec §2 "Data flow"): runs the feature extractor
//! pipeline over a supplier item's free text and merges the result into
//! `supplier_items.characteristics`.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::jobs::task::TaskKind;
use catalog_core::jobs::traits::{JobContext, JobHandler, JobResult};
use catalog_pipeline::error::{CatalogError, Result};
use catalog_pipeline::extraction::{extract_all_features, FeatureExtractor};
use catalog_pipeline::supplier_item::SupplierItemRepository;
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use crate::job_result::from_catalog_error;

pub struct EnrichItemHandler {
    pub items: Arc<dyn SupplierItemRepository>,
    pub extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl EnrichItemHandler {
    fn supplier_item_id(job_data: &JsonValue) -> Result<Uuid> {
        job_data
            .get("supplier_item_id")
            .and_then(JsonValue::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| CatalogError::validation("supplier_item_id", "missing or not a valid UUID"))
    }

    async fn run(&self, job_data: &JsonValue) -> Result<String> {
        let id = Self::supplier_item_id(job_data)?;
        let item = self.items.get_by_id(id).await?.ok_or_else(|| CatalogError::not_found(format!("supplier item {id}")))?;

        let free_text = characteristics_text(&item.name, &item.characteristics);
        let features = extract_all_features(&free_text, &self.extractors);
        if !features.has_any_features() {
            return Ok(format!("no extractable features for item {id}"));
        }

        let merged = JsonValue::Object(features.to_characteristics());
        self.items.merge_characteristics(id, merged).await?;
        info!(supplier_item_id = %id, "enriched item characteristics");
        Ok(format!("enriched item {id}"))
    }
}

/// Extractors read plain text; free-text characteristic values (the ones a
/// supplier feed already carries as strings) are folded in alongside the
/// item name so e.g. a "description" column still feeds the extractors.
fn characteristics_text(name: &str, characteristics: &JsonValue) -> String {
    let mut text = name.to_string();
    if let Some(obj) = characteristics.as_object() {
        for value in obj.values() {
            if let Some(s) = value.as_str() {
                text.push(' ');
                text.push_str(s);
            }
        }
    }
    text
}

#[async_trait]
impl JobHandler for EnrichItemHandler {
    fn job_type(&self) -> &'static str {
        TaskKind::EnrichItem.as_str()
    }

    async fn handle(&self, job_data: &JsonValue, _context: &JobContext) -> JobResult {
        match self.run(job_data).await {
            Ok(message) => JobResult::success_with_message(message),
            Err(err) => from_catalog_error(err),
        }
    }

    fn validate_job_data(&self, job_data: &JsonValue) -> catalog_core::Result<()> {
        if Self::supplier_item_id(job_data).is_err() {
            return Err(catalog_core::Error::validation("supplier_item_id must be a valid UUID"));
        }
        Ok(())
    }
}
