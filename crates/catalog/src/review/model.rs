use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::matching::MatchCandidate;

pub const DEFAULT_REVIEW_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
    NeedsCategory,
}

/// One row per `SupplierItem` in the `potential` band (spec §3); cascades
/// with the item it reviews.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchReviewQueue {
    pub id: Uuid,
    pub supplier_item_id: Uuid,
    #[sqlx(json)]
    pub candidate_products: sqlx::types::Json<Vec<MatchCandidate>>,
    pub status: ReviewStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl MatchReviewQueue {
    pub fn new(supplier_item_id: Uuid, candidates: Vec<MatchCandidate>, ttl_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            supplier_item_id,
            candidate_products: sqlx::types::Json(candidates),
            status: ReviewStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            expires_at: now + Duration::days(ttl_days),
        }
    }
}

/// Operator action against a pending review row (spec §6). `Reject` runs
/// the create-new policy using the supplier item's own name (spec §4.6
/// "Rejection runs the create-new path"); `CreateNew` overrides the name
/// the new product is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReviewAction {
    Approve { product_id: Uuid },
    Reject,
    CreateNew { new_product_name: String },
}

impl ReviewAction {
    /// Mirrors the distillation's conditional-requirement validators:
    /// `approve` requires `product_id`, `create_new` requires
    /// `new_product_name`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        match self {
            ReviewAction::CreateNew { new_product_name } if new_product_name.trim().is_empty() => {
                Err(CatalogError::validation("new_product_name", "required for create_new"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_review_row_is_pending_with_ttl_expiry() {
        let row = MatchReviewQueue::new(Uuid::new_v4(), Vec::new(), DEFAULT_REVIEW_TTL_DAYS);
        assert_eq!(row.status, ReviewStatus::Pending);
        assert!(row.expires_at > row.created_at);
    }

    #[test]
    fn create_new_without_name_is_invalid() {
        let action = ReviewAction::CreateNew { new_product_name: "  ".to_string() };
        assert!(action.validate().is_err());
    }

    #[test]
    fn approve_is_always_valid_once_constructed() {
        let action = ReviewAction::Approve { product_id: Uuid::new_v4() };
        assert!(action.validate().is_ok());
    }
}
