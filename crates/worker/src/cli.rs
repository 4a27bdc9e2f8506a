//! Operator-facing subcommands, grounded in the standalone operational
//! scripts used to run this pipeline from outside the worker process:
//! enqueueing a one-off parse task and watching queue depth/DLQ stats.

use std::collections::HashMap;
use std::time::Duration;

use catalog_core::jobs::task::{ParseTaskPayload, TaskKind, TaskMessage};
use catalog_core::jobs::{JobQueue, RedisJobQueue};
use catalog_core::Config;
use clap::{Args, Parser, Subcommand};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::bindings::enqueue_coalesced;
use crate::init_redis;

#[derive(Parser)]
#[command(name = "catalog-worker", about = "Supplier price-list ingestion worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the job executor and periodic reconcilers (default).
    Serve,
    /// Check Redis/Postgres reachability and exit 0 or 1.
    Healthcheck,
    /// Enqueue a single `parse_task` job.
    EnqueueTask(EnqueueTaskArgs),
    /// Print queue depth and DLQ stats, once or on a loop.
    MonitorQueue {
        #[arg(long)]
        watch: bool,
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

#[derive(Args)]
pub struct EnqueueTaskArgs {
    #[arg(long)]
    pub supplier_name: String,
    #[arg(long)]
    pub parser_type: String,
    /// JSON object of parser-specific source configuration, e.g. `{"sheet_url": "..."}`.
    #[arg(long)]
    pub source_config: String,
}

pub async fn enqueue_task(args: EnqueueTaskArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let redis_conn = init_redis(&config.redis.url).await?;
    let queue: Box<dyn JobQueue> = Box::new(RedisJobQueue::new(redis_conn, config.queue.queue_name.clone()));

    let raw: JsonValue = serde_json::from_str(&args.source_config)?;
    let source_config: HashMap<String, JsonValue> = raw
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("--source-config must be a JSON object"))?
        .clone()
        .into_iter()
        .collect();

    let payload = ParseTaskPayload { parser_type: args.parser_type.clone(), supplier_name: args.supplier_name.clone(), source_config };
    payload.validate()?;

    let task_id = format!("parse:manual:{}", args.supplier_name);
    let data = serde_json::to_value(&payload)?;
    let msg = TaskMessage::new(task_id.clone(), TaskKind::ParseTask, data);
    enqueue_coalesced(queue.as_ref(), msg).await?;

    info!(task_id, supplier = %args.supplier_name, "enqueued parse_task");
    println!("enqueued {task_id}");
    Ok(())
}

pub async fn monitor_queue(watch: bool, interval: u64) -> anyhow::Result<()> {
    let config = Config::load()?;

    loop {
        let redis_conn = init_redis(&config.redis.url).await?;
        let queue = RedisJobQueue::new(redis_conn, config.queue.queue_name.clone());
        let stats = queue.get_stats().await?;

        println!(
            "queued={} processing={} completed={} failed={} retrying={} dlq={} success_rate={:.1}%",
            stats.queued_jobs,
            stats.processing_jobs,
            stats.completed_jobs,
            stats.failed_jobs,
            stats.retrying_jobs,
            stats.dlq_jobs,
            stats.success_rate() * 100.0,
        );

        if stats.queued_jobs >= config.queue.depth_warning_threshold {
            eprintln!("warning: queue depth {} exceeds threshold {}", stats.queued_jobs, config.queue.depth_warning_threshold);
        }

        if !watch {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(interval)).await;
    }
}
