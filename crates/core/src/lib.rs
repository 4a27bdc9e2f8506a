pub mod config;
pub mod database;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod types;
pub mod utils;

pub use config::Config;
pub use database::DatabasePool;
pub use error::{Error, ErrorCode, ErrorContext, ErrorMetrics, Result};
pub use jobs::{JobExecutor, JobQueue, RedisJobQueue, SerializableJob, TaskMessage, TaskKind};
pub use metrics::{MetricsRegistry, MetricsService, QueueMetrics};
pub use types::*;
pub use utils::{is_safe_relative_path, validate_email};

// Re-export commonly used types from dependencies
pub use uuid::Uuid;
pub use chrono::{DateTime, Utc};