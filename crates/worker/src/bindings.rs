//! Concrete Redis-backed bindings for the narrow traits the pipeline crate
//! exposes so its business logic never depends on the job-queue backend
//! directly (spec §4.1, §4.5, §4.7).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::jobs::task::{ParseTaskPayload, TaskKind, TaskMessage};
use catalog_core::jobs::types::{JobId, JobStatus, QueuedJob};
use catalog_core::jobs::JobQueue;
use catalog_pipeline::aggregation::AggregateTrigger;
use catalog_pipeline::error::{CatalogError, Result};
use catalog_pipeline::supplier::SourceType;
use catalog_pipeline::sync::{ParseTaskDispatcher, SyncStatusMessage, SyncStatusStore};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

/// Enqueues `msg` keyed by its own `task_id`, coalescing with any still-active
/// job of the same id (spec §9 "Aggregate coalescing").
pub async fn enqueue_coalesced(queue: &dyn JobQueue, msg: TaskMessage) -> Result<()> {
    let job_id = JobId::from_string(msg.task_id.clone());
    if let Some(existing) = queue.get_status(&job_id).await? {
        if existing.is_active() {
            debug!(task_id = %msg.task_id, "task already queued, coalescing");
            return Ok(());
        }
    }

    let status = JobStatus::new(job_id.clone(), msg.kind.as_str(), msg.priority).with_max_attempts(msg.max_retries);
    let job = QueuedJob { id: job_id, job_type: msg.kind.as_str().to_string(), priority: msg.priority, data: msg.payload, status };
    queue.enqueue(job).await?;
    Ok(())
}

pub struct RedisAggregateTrigger {
    queue: Arc<dyn JobQueue>,
}

impl RedisAggregateTrigger {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl AggregateTrigger for RedisAggregateTrigger {
    async fn trigger(&self, product_id: Uuid) -> Result<()> {
        let task_id = TaskMessage::recalc_task_id(&product_id);
        let msg = TaskMessage::new(task_id, TaskKind::RecalcAggregates, json!({ "product_id": product_id }));
        enqueue_coalesced(self.queue.as_ref(), msg).await
    }
}

pub struct RedisParseTaskDispatcher {
    queue: Arc<dyn JobQueue>,
}

impl RedisParseTaskDispatcher {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl ParseTaskDispatcher for RedisParseTaskDispatcher {
    async fn dispatch(&self, supplier_id: Uuid, supplier_name: &str, source_type: SourceType, source_url: &str) -> Result<()> {
        let mut source_config: HashMap<String, serde_json::Value> = HashMap::new();
        source_config.insert("column_mapping".into(), json!({}));
        source_config.insert("characteristic_columns".into(), json!([]));
        source_config.insert("header_row".into(), json!(1));
        source_config.insert("data_start_row".into(), json!(2));
        match source_type {
            SourceType::GoogleSheets => {
                source_config.insert("sheet_url".into(), json!(source_url));
                source_config.insert("sheet_name".into(), json!("Sheet1"));
            }
            SourceType::Csv | SourceType::Excel => {
                source_config.insert("file_path".into(), json!(source_url));
            }
        }

        let payload = ParseTaskPayload { parser_type: source_type.as_str().to_string(), supplier_name: supplier_name.to_string(), source_config };
        payload.validate().map_err(CatalogError::Core)?;

        let task_id = format!("parse:{supplier_id}");
        let data = serde_json::to_value(&payload).map_err(CatalogError::Serialization)?;
        let msg = TaskMessage::new(task_id, TaskKind::ParseTask, data);
        enqueue_coalesced(self.queue.as_ref(), msg).await
    }
}

pub struct RedisSyncStatusStore {
    redis: ConnectionManager,
    key: String,
}

impl RedisSyncStatusStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis, key: "catalog:sync:status".to_string() }
    }
}

#[async_trait]
impl SyncStatusStore for RedisSyncStatusStore {
    async fn get(&self) -> Result<SyncStatusMessage> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = conn.get(&self.key).await.map_err(|e| CatalogError::Core(e.into()))?;
        match raw {
            Some(json) => serde_json::from_str(&json).map_err(CatalogError::Serialization),
            None => Ok(SyncStatusMessage::default()),
        }
    }

    async fn set(&self, status: SyncStatusMessage) -> Result<()> {
        let mut conn = self.redis.clone();
        let json = serde_json::to_string(&status).map_err(CatalogError::Serialization)?;
        conn.set::<_, _, ()>(&self.key, json).await.map_err(|e| CatalogError::Core(e.into()))?;
        Ok(())
    }
}
