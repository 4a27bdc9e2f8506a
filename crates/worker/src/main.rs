//! Catalog worker: the process that drains the work queue (spec §2, §5).
//!
//! Subcommands:
//! - `serve` (default) — run the job executor plus the periodic master-sync
//!   and review-expiry loops until signalled to stop.
//! - `healthcheck` — one-shot Redis/Postgres reachability check for
//!   container orchestrators.
//! - `enqueue-task` — enqueue a single `parse_task` from the command line.
//! - `monitor-queue` — print queue depth/DLQ stats, optionally on a loop.

mod bindings;
mod cli;
mod handlers;
mod healthcheck;
mod job_result;

use std::sync::Arc;
use std::time::Duration;

use catalog_core::jobs::{ExecutorConfig, JobExecutor, JobQueue, RedisJobQueue};
use catalog_core::{Config, DatabasePool};
use catalog_pipeline::category::PostgresCategoryRepository;
use catalog_pipeline::extraction::default_extractors;
use catalog_pipeline::matching::{MatcherConfig, MatchingWorker};
use catalog_pipeline::parsing::register_default_parsers;
use catalog_pipeline::parsing_log::PostgresParsingLogRepository;
use catalog_pipeline::product::{DefaultProductService, PostgresProductRepository};
use catalog_pipeline::review::{DefaultReviewService, PostgresReviewRepository, ReviewService};
use catalog_pipeline::supplier::PostgresSupplierRepository;
use catalog_pipeline::supplier_item::PostgresSupplierItemRepository;
use catalog_pipeline::sync::MasterSyncOrchestrator;
use clap::Parser;
use redis::aio::ConnectionManager;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bindings::{RedisAggregateTrigger, RedisParseTaskDispatcher, RedisSyncStatusStore};
use cli::{Cli, Command};
use handlers::{EnrichItemHandler, MatchItemsHandler, ParseTaskHandler, RecalcAggregatesHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Healthcheck => healthcheck::run().await,
        Command::EnqueueTask(args) => cli::enqueue_task(args).await,
        Command::MonitorQueue { watch, interval } => cli::monitor_queue(watch, interval).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "catalog_worker=info,catalog_pipeline=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn init_redis(url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let client = redis::Client::open(url)?;
    ConnectionManager::new(client).await
}

/// Bundled repositories every handler needs; built once at startup and
/// shared across the executor, the matching worker, and the periodic loops.
struct Dependencies {
    queue: Arc<dyn JobQueue>,
    suppliers: Arc<PostgresSupplierRepository>,
    items: Arc<PostgresSupplierItemRepository>,
    categories: Arc<PostgresCategoryRepository>,
    products: Arc<PostgresProductRepository>,
    reviews: Arc<PostgresReviewRepository>,
    parsing_logs: Arc<PostgresParsingLogRepository>,
    aggregates: Arc<RedisAggregateTrigger>,
    config: Config,
}

async fn build_dependencies() -> anyhow::Result<Dependencies> {
    let config = Config::load()?;
    let db = DatabasePool::new(config.database.clone()).await?;
    db.check_health().await?;

    let redis_conn = init_redis(&config.redis.url).await?;
    let queue: Arc<dyn JobQueue> = Arc::new(RedisJobQueue::new(redis_conn, config.queue.queue_name.clone()));

    register_default_parsers();

    Ok(Dependencies {
        aggregates: Arc::new(RedisAggregateTrigger::new(queue.clone())),
        suppliers: Arc::new(PostgresSupplierRepository::new(db.clone())),
        items: Arc::new(PostgresSupplierItemRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        products: Arc::new(PostgresProductRepository::new(db.clone())),
        reviews: Arc::new(PostgresReviewRepository::new(db.clone())),
        parsing_logs: Arc::new(PostgresParsingLogRepository::new(db)),
        queue,
        config,
    })
}

async fn serve() -> anyhow::Result<()> {
    let deps = build_dependencies().await?;

    let matcher_config = MatcherConfig::new(deps.config.matching.auto_match_threshold, deps.config.matching.review_threshold, deps.config.matching.max_candidates);
    let products_repo: Arc<dyn catalog_pipeline::product::ProductRepository> = deps.products.clone();
    let product_service = Arc::new(DefaultProductService::new(products_repo.clone(), deps.config.matching.internal_sku_prefix.clone()));
    let categories_repo: Arc<dyn catalog_pipeline::category::CategoryRepository> = deps.categories.clone();
    let reviews_repo: Arc<dyn catalog_pipeline::review::ReviewRepository> = deps.reviews.clone();
    let items_repo: Arc<dyn catalog_pipeline::supplier_item::SupplierItemRepository> = deps.items.clone();
    let aggregates: Arc<dyn catalog_pipeline::aggregation::AggregateTrigger> = deps.aggregates.clone();

    let mut matching_worker = MatchingWorker::new(
        items_repo.clone(),
        categories_repo.clone(),
        products_repo.clone(),
        product_service.clone() as Arc<dyn catalog_pipeline::product::ProductService>,
        reviews_repo.clone(),
        aggregates.clone(),
    );
    matching_worker.config = matcher_config;
    matching_worker.review_ttl_days = deps.config.matching.review_ttl_days;
    let matching_worker = Arc::new(matching_worker);

    let review_service = Arc::new(DefaultReviewService {
        reviews: reviews_repo,
        items: items_repo.clone(),
        products: product_service.clone() as Arc<dyn catalog_pipeline::product::ProductService>,
        aggregates: aggregates.clone(),
    });

    let mut executor = JobExecutor::new(
        deps.queue.clone(),
        ExecutorConfig { max_concurrent_jobs: deps.config.queue.max_workers, job_timeout: Duration::from_secs(deps.config.queue.job_timeout_seconds), ..Default::default() },
    );

    executor
        .register_handler(Arc::new(ParseTaskHandler {
            suppliers: deps.suppliers.clone(),
            items: items_repo.clone(),
            parsing_logs: deps.parsing_logs.clone(),
            queue: deps.queue.clone(),
        }))
        .await;
    executor.register_handler(Arc::new(MatchItemsHandler { worker: matching_worker.clone() })).await;
    executor.register_handler(Arc::new(RecalcAggregatesHandler { items: items_repo.clone(), products: products_repo.clone() })).await;
    executor.register_handler(Arc::new(EnrichItemHandler { items: items_repo, extractors: default_extractors() })).await;

    executor.start().await?;
    info!("catalog worker started");

    let sync_handle = spawn_master_sync_loop(deps.suppliers.clone(), deps.queue.clone(), deps.config.clone());
    let expiry_handle = spawn_review_expiry_loop(review_service, deps.config.app.review_expiry_interval_seconds);

    shutdown_signal().await;
    info!("shutdown signal received, stopping worker");
    sync_handle.abort();
    expiry_handle.abort();
    executor.stop().await?;

    Ok(())
}

/// Periodic master-sync reconciler (spec §4.7 "periodic reconciler"). A
/// missing `master_sheet_url` disables the loop entirely rather than
/// failing startup, since master-sync is optional infrastructure.
fn spawn_master_sync_loop(suppliers: Arc<PostgresSupplierRepository>, queue: Arc<dyn JobQueue>, config: Config) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Some(sheet_url) = config.app.master_sheet_url.clone() else {
            info!("master_sheet_url not configured, periodic master-sync disabled");
            return;
        };

        let redis_conn = match init_redis(&config.redis.url).await {
            Ok(conn) => conn,
            Err(err) => {
                error!(error = %err, "master-sync loop failed to connect to redis, disabled");
                return;
            }
        };

        let orchestrator = MasterSyncOrchestrator {
            suppliers,
            status: Arc::new(RedisSyncStatusStore::new(redis_conn)),
            dispatcher: Arc::new(RedisParseTaskDispatcher::new(queue)),
        };

        let mut interval = tokio::time::interval(Duration::from_secs(config.app.sync_interval_seconds.max(1)));
        loop {
            interval.tick().await;
            match fetch_master_sheet(&sheet_url).await {
                Ok(rows) => {
                    let task_id = format!("master-sync:{}", chrono::Utc::now().timestamp());
                    match orchestrator.run(&task_id, rows).await {
                        Ok(result) => info!(?result, "master-sync complete"),
                        Err(err) => warn!(error = %err, "master-sync run failed"),
                    }
                }
                Err(err) => warn!(error = %err, "failed to fetch master sheet"),
            }
        }
    })
}

async fn fetch_master_sheet(sheet_url: &str) -> anyhow::Result<Vec<catalog_pipeline::supplier::SupplierConfigRow>> {
    let body = reqwest::get(sheet_url).await?.text().await?;
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: catalog_pipeline::supplier::SupplierConfigRow = record?;
        rows.push(row);
    }
    Ok(rows)
}

fn spawn_review_expiry_loop(review_service: Arc<DefaultReviewService>, interval_seconds: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
        loop {
            interval.tick().await;
            match review_service.expire_due().await {
                Ok(count) if count > 0 => info!(count, "expired stale reviews"),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "review expiry pass failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
