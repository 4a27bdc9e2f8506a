//! Human review queue (spec §3 `MatchReviewQueue`, §4.6): items the matcher
//! places in the `potential` band await approval, rejection, or TTL expiry.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{MatchReviewQueue, ReviewAction, ReviewStatus, DEFAULT_REVIEW_TTL_DAYS};
pub use repository::{PostgresReviewRepository, ReviewQueueFilter, ReviewRepository};
pub use service::{DefaultReviewService, ReviewService};
