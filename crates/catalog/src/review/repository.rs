use async_trait::async_trait;
use catalog_core::DatabasePool;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::model::{MatchReviewQueue, ReviewStatus};
use crate::error::{CatalogError, Result};

const SELECT_COLUMNS: &str =
    "id, supplier_item_id, candidate_products, status, reviewed_by, reviewed_at, created_at, expires_at";

/// Filter for listing the review queue (spec §6).
#[derive(Debug, Clone, Default)]
pub struct ReviewQueueFilter {
    pub status: Option<ReviewStatus>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl ReviewQueueFilter {
    pub fn validate(&self) -> Result<()> {
        if self.limit < 1 || self.limit > 200 {
            return Err(CatalogError::validation("limit", "must be between 1 and 200"));
        }
        if let (Some(min), Some(max)) = (self.min_score, self.max_score) {
            if max < min {
                return Err(CatalogError::validation("max_score", "must be >= min_score"));
            }
        }
        Ok(())
    }
}

fn row_to_review(row: sqlx::postgres::PgRow) -> MatchReviewQueue {
    MatchReviewQueue {
        id: row.get("id"),
        supplier_item_id: row.get("supplier_item_id"),
        candidate_products: row.get("candidate_products"),
        status: row.get("status"),
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
    }
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts a review row; fails if one already exists for the item
    /// (spec §3 "at most one `MatchReviewQueue` row per `SupplierItem`").
    async fn create(&self, review: &MatchReviewQueue) -> Result<MatchReviewQueue>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MatchReviewQueue>>;

    async fn get_by_supplier_item(&self, supplier_item_id: Uuid) -> Result<Option<MatchReviewQueue>>;

    async fn list(&self, filter: &ReviewQueueFilter) -> Result<Vec<MatchReviewQueue>>;

    async fn mark_approved(&self, id: Uuid, reviewed_by: &str) -> Result<()>;

    async fn mark_rejected(&self, id: Uuid, reviewed_by: &str) -> Result<()>;

    /// Rows past their TTL (spec §4.6 "Expiry worker").
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<MatchReviewQueue>>;

    async fn mark_expired(&self, id: Uuid) -> Result<()>;
}

pub struct PostgresReviewRepository {
    db: DatabasePool,
}

impl PostgresReviewRepository {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::PgPool {
        &self.db.pool
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &MatchReviewQueue) -> Result<MatchReviewQueue> {
        let query = format!(
            r#"
            INSERT INTO match_review_queue
                (id, supplier_item_id, candidate_products, status, reviewed_by, reviewed_at, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(review.id)
            .bind(review.supplier_item_id)
            .bind(&review.candidate_products)
            .bind(review.status)
            .bind(&review.reviewed_by)
            .bind(review.reviewed_at)
            .bind(review.created_at)
            .bind(review.expires_at)
            .fetch_one(self.pool())
            .await?;
        Ok(row_to_review(row))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MatchReviewQueue>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM match_review_queue WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(self.pool()).await?;
        Ok(row.map(row_to_review))
    }

    async fn get_by_supplier_item(&self, supplier_item_id: Uuid) -> Result<Option<MatchReviewQueue>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM match_review_queue WHERE supplier_item_id = $1");
        let row = sqlx::query(&query).bind(supplier_item_id).fetch_optional(self.pool()).await?;
        Ok(row.map(row_to_review))
    }

    async fn list(&self, filter: &ReviewQueueFilter) -> Result<Vec<MatchReviewQueue>> {
        filter.validate()?;
        let mut conditions = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $1".to_string());
        }
        if filter.created_after.is_some() {
            conditions.push(format!("created_at >= ${}", conditions.len() + 2));
        }
        if filter.created_before.is_some() {
            conditions.push(format!("created_at <= ${}", conditions.len() + 2));
        }
        let where_clause =
            if conditions.is_empty() { String::new() } else { format!("WHERE {}", conditions.join(" AND ")) };

        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM match_review_queue {where_clause} \
             ORDER BY created_at ASC LIMIT {} OFFSET {}",
            filter.limit, filter.offset
        );

        let mut q = sqlx::query(&query);
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(after) = filter.created_after {
            q = q.bind(after);
        }
        if let Some(before) = filter.created_before {
            q = q.bind(before);
        }

        let rows = q.fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(row_to_review).collect())
    }

    async fn mark_approved(&self, id: Uuid, reviewed_by: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE match_review_queue SET status = 'approved', reviewed_by = $2, reviewed_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(reviewed_by)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("review {id}")));
        }
        Ok(())
    }

    async fn mark_rejected(&self, id: Uuid, reviewed_by: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE match_review_queue SET status = 'rejected', reviewed_by = $2, reviewed_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(reviewed_by)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("review {id}")));
        }
        Ok(())
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<MatchReviewQueue>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM match_review_queue WHERE status = 'pending' AND expires_at <= $1"
        );
        let rows = sqlx::query(&query).bind(now).fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(row_to_review).collect())
    }

    async fn mark_expired(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE match_review_queue SET status = 'expired' WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("review {id}")));
        }
        Ok(())
    }
}
