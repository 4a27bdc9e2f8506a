//! `parse_task` handler (spec §2 "Data flow"): runs the registered parser,
//! upserts each valid row, logs and skips invalid ones, then fans out
//! `enrich_item` and `match_items_task` follow-up work.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::jobs::task::{TaskKind, TaskMessage};
use catalog_core::jobs::traits::{JobContext, JobHandler, JobResult};
use catalog_core::jobs::JobQueue;
use catalog_pipeline::error::{CatalogError, Result};
use catalog_pipeline::parsing::{ParsedSupplierItem, ParserRegistry};
use catalog_pipeline::parsing_log::{ParsingLog, ParsingLogRepository};
use catalog_pipeline::supplier::SupplierRepository;
use catalog_pipeline::supplier_item::SupplierItemRepository;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::bindings::enqueue_coalesced;
use crate::job_result::from_catalog_error;

pub struct ParseTaskHandler {
    pub suppliers: Arc<dyn SupplierRepository>,
    pub items: Arc<dyn SupplierItemRepository>,
    pub parsing_logs: Arc<dyn ParsingLogRepository>,
    pub queue: Arc<dyn JobQueue>,
}

impl ParseTaskHandler {
    async fn run(&self, task_id: &str, job_data: &JsonValue) -> Result<String> {
        let payload: catalog_core::jobs::task::ParseTaskPayload =
            serde_json::from_value(job_data.clone()).map_err(CatalogError::Serialization)?;
        payload.validate().map_err(CatalogError::Core)?;

        let supplier = self
            .suppliers
            .get_by_name(&payload.supplier_name)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("supplier '{}'", payload.supplier_name)))?;

        let parser = ParserRegistry::get(&payload.parser_type)?;
        let config = JsonValue::Object(payload.source_config.clone().into_iter().collect());
        let parsed: Vec<ParsedSupplierItem> = parser.parse(&config).await?;

        let mut upserted = 0;
        let mut skipped = 0;
        for (row_number, item) in parsed.into_iter().enumerate() {
            if let Err(err) = item.validate() {
                skipped += 1;
                let log = ParsingLog::new(task_id, Some(supplier.id), "validation", err.to_string())
                    .with_row(row_number as i64, serde_json::to_value(&item).unwrap_or(JsonValue::Null));
                if let Err(log_err) = self.parsing_logs.record(&log).await {
                    warn!(task_id, error = %log_err, "failed to record parsing log");
                }
                continue;
            }

            let characteristics = JsonValue::Object(item.characteristics.clone().into_iter().collect());
            match self
                .items
                .upsert(supplier.id, &item.supplier_sku, &item.name, item.price, characteristics, item.in_stock)
                .await
            {
                Ok((stored, _inserted)) => {
                    upserted += 1;
                    let enrich_task_id = format!("enrich:{}", stored.id);
                    let msg = TaskMessage::new(enrich_task_id, TaskKind::EnrichItem, serde_json::json!({ "supplier_item_id": stored.id }));
                    if let Err(err) = enqueue_coalesced(self.queue.as_ref(), msg).await {
                        warn!(task_id, error = %err, "failed to enqueue enrich_item");
                    }
                }
                Err(err) => {
                    skipped += 1;
                    let log = ParsingLog::new(task_id, Some(supplier.id), "upsert", err.to_string())
                        .with_row(row_number as i64, serde_json::to_value(&item).unwrap_or(JsonValue::Null));
                    if let Err(log_err) = self.parsing_logs.record(&log).await {
                        warn!(task_id, error = %log_err, "failed to record parsing log");
                    }
                }
            }
        }

        if upserted > 0 {
            let match_msg = TaskMessage::new("match:batch".to_string(), TaskKind::MatchItemsTask, serde_json::json!({}));
            if let Err(err) = enqueue_coalesced(self.queue.as_ref(), match_msg).await {
                warn!(task_id, error = %err, "failed to enqueue match_items_task");
            }
        }

        info!(task_id, supplier = %payload.supplier_name, upserted, skipped, "parse_task complete");
        Ok(format!("upserted {upserted} items, skipped {skipped}"))
    }
}

#[async_trait]
impl JobHandler for ParseTaskHandler {
    fn job_type(&self) -> &'static str {
        TaskKind::ParseTask.as_str()
    }

    async fn handle(&self, job_data: &JsonValue, context: &JobContext) -> JobResult {
        match self.run(context.job_id.as_str(), job_data).await {
            Ok(message) => JobResult::success_with_message(message),
            Err(err) => from_catalog_error(err),
        }
    }

    fn validate_job_data(&self, job_data: &JsonValue) -> catalog_core::Result<()> {
        let payload: catalog_core::jobs::task::ParseTaskPayload =
            serde_json::from_value(job_data.clone()).map_err(catalog_core::Error::from)?;
        payload.validate()
    }
}
