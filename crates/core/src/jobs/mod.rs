pub mod executor;
pub mod queue;
pub mod task;
pub mod traits;
pub mod types;

pub use executor::{JobExecutor, ExecutorConfig};
pub use queue::RedisJobQueue;
pub use task::{ParseTaskPayload, TaskKind, TaskMessage};
pub use traits::JobQueue;
pub use traits::{Job, JobHandler, JobResult};
pub use types::{JobId, JobPriority, JobState, JobStatus, SerializableJob};