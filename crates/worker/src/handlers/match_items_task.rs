//! `match_items_task` handler (spec §4.6): drains one claimed batch through
//! the matching pipeline worker per invocation.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::jobs::task::TaskKind;
use catalog_core::jobs::traits::{JobContext, JobHandler, JobResult};
use catalog_pipeline::error::Result;
use catalog_pipeline::matching::MatchingWorker;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::job_result::from_catalog_error;

const DEFAULT_BATCH_LIMIT: i64 = 100;

pub struct MatchItemsHandler {
    pub worker: Arc<MatchingWorker>,
}

impl MatchItemsHandler {
    async fn run(&self, job_data: &JsonValue) -> Result<String> {
        let limit = job_data.get("limit").and_then(JsonValue::as_i64).unwrap_or(DEFAULT_BATCH_LIMIT);
        let processed = self.worker.run_batch(limit).await?;
        info!(processed, "match_items_task complete");
        Ok(format!("processed {processed} items"))
    }
}

#[async_trait]
impl JobHandler for MatchItemsHandler {
    fn job_type(&self) -> &'static str {
        TaskKind::MatchItemsTask.as_str()
    }

    async fn handle(&self, job_data: &JsonValue, _context: &JobContext) -> JobResult {
        match self.run(job_data).await {
            Ok(message) => JobResult::success_with_message(message),
            Err(err) => from_catalog_error(err),
        }
    }

    fn validate_job_data(&self, _job_data: &JsonValue) -> catalog_core::Result<()> {
        Ok(())
    }
}
