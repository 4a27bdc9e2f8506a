//! One-shot reachability check for container orchestrators: exits 0 when
//! both Redis and Postgres answer, 1 otherwise. No partial-credit states —
//! an orchestrator only needs a boolean.

use catalog_core::jobs::{JobQueue, RedisJobQueue};
use catalog_core::{Config, DatabasePool};
use tracing::{error, info};

use crate::init_redis;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut healthy = true;

    match DatabasePool::new(config.database.clone()).await {
        Ok(db) => match db.check_health().await {
            Ok(()) => info!("postgres: ok"),
            Err(err) => {
                error!(error = %err, "postgres: unreachable");
                healthy = false;
            }
        },
        Err(err) => {
            error!(error = %err, "postgres: failed to connect");
            healthy = false;
        }
    }

    match init_redis(&config.redis.url).await {
        Ok(conn) => {
            let queue = RedisJobQueue::new(conn, config.queue.queue_name.clone());
            match queue.health_check().await {
                Ok(true) => info!("redis: ok"),
                Ok(false) | Err(_) => {
                    error!("redis: unreachable");
                    healthy = false;
                }
            }
        }
        Err(err) => {
            error!(error = %err, "redis: failed to connect");
            healthy = false;
        }
    }

    if healthy {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
