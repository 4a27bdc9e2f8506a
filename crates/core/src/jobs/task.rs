//! The common task envelope (spec.md §4.1 `TaskMessage`, §6 `parse_task` v1).
//!
//! This sits one layer above the generic [`super::types::QueuedJob`] wrapper:
//! `TaskMessage` is the payload applications enqueue; the queue wraps it in a
//! `QueuedJob` for storage. Keeping the two separate lets the queue stay
//! kind-agnostic while callers get a typed, validated envelope.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::JobPriority;

/// Discriminates the payload carried by a [`TaskMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ParseTask,
    MatchItemsTask,
    RecalcAggregates,
    EnrichItem,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::ParseTask => "parse_task",
            TaskKind::MatchItemsTask => "match_items_task",
            TaskKind::RecalcAggregates => "recalc_aggregates",
            TaskKind::EnrichItem => "enrich_item",
        }
    }
}

/// `kind=parse_task` payload (spec.md §6): parser selection plus its source
/// configuration. A `stub` parser accepts an empty `source_config`; every
/// other parser requires a non-empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseTaskPayload {
    pub parser_type: String,
    pub supplier_name: String,
    pub source_config: HashMap<String, serde_json::Value>,
}

impl ParseTaskPayload {
    pub fn validate(&self) -> Result<()> {
        if self.supplier_name.trim().is_empty() {
            return Err(Error::validation("supplier_name must not be empty"));
        }
        if self.parser_type.trim().is_empty() {
            return Err(Error::validation("parser_type must not be empty"));
        }
        if self.parser_type != "stub" && self.source_config.is_empty() {
            return Err(Error::validation(format!(
                "source_config is required for parser_type '{}'",
                self.parser_type
            )));
        }
        Ok(())
    }
}

/// The common envelope for every task moving through the queue.
///
/// `task_id` uniqueness is enforced by the queue at enqueue time
/// (`Error::duplicate_task` on collision); `retry_count`/`max_retries`
/// drive the backoff-then-DLQ decision in the worker loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    pub task_id: String,
    pub kind: TaskKind,
    pub payload: serde_json::Value,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: JobPriority,
}

fn default_max_retries() -> u32 {
    3
}

impl TaskMessage {
    pub fn new(task_id: impl Into<String>, kind: TaskKind, payload: serde_json::Value) -> Self {
        Self {
            task_id: task_id.into(),
            kind,
            payload,
            retry_count: 0,
            max_retries: default_max_retries(),
            enqueued_at: Utc::now(),
            priority: JobPriority::Normal,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_priority(mut self, priority: JobPriority) -> Self {
        self.priority = priority;
        self
    }

    /// `max_retries` must be in `1..=10` (spec.md §4.1); `task_id` must be
    /// non-empty. Kind-specific payload validation (e.g. `ParseTaskPayload`)
    /// is the caller's responsibility once the payload is deserialized.
    pub fn validate(&self) -> Result<()> {
        if self.task_id.trim().is_empty() {
            return Err(Error::validation("task_id must not be empty"));
        }
        if !(1..=10).contains(&self.max_retries) {
            return Err(Error::validation(
                "max_retries must be between 1 and 10 inclusive",
            ));
        }
        Ok(())
    }

    /// Deduplication key for aggregate-recompute coalescing (spec.md §4.5,
    /// §9 "Aggregate coalescing"): `recalc:{product_id}`.
    pub fn recalc_task_id(product_id: &uuid::Uuid) -> String {
        format!("recalc:{product_id}")
    }

    /// Next retry attempt with exponential backoff applied by the caller;
    /// bumps `retry_count` and leaves everything else untouched.
    pub fn with_retry_incremented(mut self) -> Self {
        self.retry_count += 1;
        self
    }

    pub fn exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }

    /// User-visible retry summary string (spec.md §7).
    pub fn retry_summary(&self, completed: bool) -> String {
        if self.retry_count == 0 {
            return if completed {
                String::new()
            } else {
                String::new()
            };
        }
        if completed {
            format!("Completed after {} retry attempt(s)", self.retry_count)
        } else if self.exhausted() {
            format!(
                "Failed after {}/{} retry attempts",
                self.retry_count, self.max_retries
            )
        } else {
            format!(
                "Retry attempt {}/{} in progress",
                self.retry_count, self.max_retries
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_task_id() {
        let msg = TaskMessage::new("", TaskKind::ParseTask, serde_json::json!({}));
        assert!(msg.validate().is_err());
    }

    #[test]
    fn rejects_max_retries_out_of_range() {
        let msg = TaskMessage::new("t1", TaskKind::ParseTask, serde_json::json!({}))
            .with_max_retries(0);
        assert!(msg.validate().is_err());

        let msg = TaskMessage::new("t1", TaskKind::ParseTask, serde_json::json!({}))
            .with_max_retries(11);
        assert!(msg.validate().is_err());
    }

    #[test]
    fn stub_parser_accepts_empty_source_config() {
        let payload = ParseTaskPayload {
            parser_type: "stub".to_string(),
            supplier_name: "Acme".to_string(),
            source_config: HashMap::new(),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn non_stub_parser_requires_source_config() {
        let payload = ParseTaskPayload {
            parser_type: "csv".to_string(),
            supplier_name: "Acme".to_string(),
            source_config: HashMap::new(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn retry_summary_matches_spec_strings() {
        let mut msg = TaskMessage::new("t1", TaskKind::ParseTask, serde_json::json!({}))
            .with_max_retries(3);
        assert_eq!(msg.retry_summary(false), "");

        msg.retry_count = 1;
        assert_eq!(msg.retry_summary(false), "Retry attempt 1/3 in progress");

        msg.retry_count = 3;
        assert_eq!(msg.retry_summary(false), "Failed after 3/3 retry attempts");
        assert_eq!(msg.retry_summary(true), "Completed after 3 retry attempt(s)");
    }

    #[test]
    fn recalc_task_id_is_keyed_by_product() {
        let id = uuid::Uuid::nil();
        assert_eq!(TaskMessage::recalc_task_id(&id), format!("recalc:{id}"));
    }
}
