//! `recalc_aggregates` handler (spec §4.5): recomputes one product's
//! `min_price`/`availability` from its currently linked supplier items.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::jobs::task::TaskKind;
use catalog_core::jobs::traits::{JobContext, JobHandler, JobResult};
use catalog_pipeline::aggregation;
use catalog_pipeline::error::{CatalogError, Result};
use catalog_pipeline::product::ProductRepository;
use catalog_pipeline::supplier_item::SupplierItemRepository;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::job_result::from_catalog_error;

pub struct RecalcAggregatesHandler {
    pub items: Arc<dyn SupplierItemRepository>,
    pub products: Arc<dyn ProductRepository>,
}

impl RecalcAggregatesHandler {
    fn product_id(job_data: &JsonValue) -> Result<Uuid> {
        job_data
            .get("product_id")
            .and_then(JsonValue::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| CatalogError::validation("product_id", "missing or not a valid UUID"))
    }

    async fn run(&self, job_data: &JsonValue) -> Result<String> {
        let product_id = Self::product_id(job_data)?;
        aggregation::recompute(product_id, self.items.as_ref(), self.products.as_ref()).await?;
        Ok(format!("recomputed aggregates for product {product_id}"))
    }
}

#[async_trait]
impl JobHandler for RecalcAggregatesHandler {
    fn job_type(&self) -> &'static str {
        TaskKind::RecalcAggregates.as_str()
    }

    async fn handle(&self, job_data: &JsonValue, _context: &JobContext) -> JobResult {
        match self.run(job_data).await {
            Ok(message) => JobResult::success_with_message(message),
            Err(err) => from_catalog_error(err),
        }
    }

    fn validate_job_data(&self, job_data: &JsonValue) -> catalog_core::Result<()> {
        if Self::product_id(job_data).is_err() {
            return Err(catalog_core::Error::validation("product_id must be a valid UUID"));
        }
        Ok(())
    }
}
