//! Review-queue lifecycle (spec §4.6 "Manual match events", §6 `ReviewAction`).

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::model::ReviewAction;
use super::repository::ReviewRepository;
use crate::aggregation::AggregateTrigger;
use crate::error::{CatalogError, Result};
use crate::product::ProductService;
use crate::supplier_item::SupplierItemRepository;

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Applies an operator decision to a pending review row. Returns the
    /// product the supplier item ends up linked to.
    async fn apply(&self, review_id: Uuid, action: ReviewAction, reviewed_by: &str) -> Result<Uuid>;

    /// Expires due rows and reverts their items to `unmatched` (spec §4.6
    /// "Expiry worker"). Returns the number of rows expired.
    async fn expire_due(&self) -> Result<usize>;
}

pub struct DefaultReviewService {
    pub reviews: std::sync::Arc<dyn ReviewRepository>,
    pub items: std::sync::Arc<dyn SupplierItemRepository>,
    pub products: std::sync::Arc<dyn ProductService>,
    pub aggregates: std::sync::Arc<dyn AggregateTrigger>,
}

#[async_trait]
impl ReviewService for DefaultReviewService {
    async fn apply(&self, review_id: Uuid, action: ReviewAction, reviewed_by: &str) -> Result<Uuid> {
        action.validate()?;
        let review = self
            .reviews
            .get_by_id(review_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("review {review_id}")))?;

        let mut relinked_from = None;
        let product_id = match action {
            ReviewAction::Approve { product_id } => {
                let item = self
                    .items
                    .get_by_id(review.supplier_item_id)
                    .await?
                    .ok_or_else(|| CatalogError::not_found(format!("supplier item {}", review.supplier_item_id)))?;
                if let Some(old) = item.product_id {
                    if old != product_id {
                        relinked_from = Some(old);
                    }
                }
                self.items.link_to_product(review.supplier_item_id, product_id).await?;
                self.reviews.mark_approved(review_id, reviewed_by).await?;
                product_id
            }
            ReviewAction::Reject | ReviewAction::CreateNew { .. } => {
                let item = self
                    .items
                    .get_by_id(review.supplier_item_id)
                    .await?
                    .ok_or_else(|| CatalogError::not_found(format!("supplier item {}", review.supplier_item_id)))?;
                let name = match &action {
                    ReviewAction::CreateNew { new_product_name } => new_product_name.clone(),
                    _ => item.name.clone(),
                };
                if let Some(old) = item.product_id {
                    relinked_from = Some(old);
                }
                let product = self.products.create_new(&name, item.category_id).await?;
                self.items.link_to_product(review.supplier_item_id, product.id).await?;
                self.reviews.mark_rejected(review_id, reviewed_by).await?;
                product.id
            }
        };

        if let Some(old) = relinked_from {
            self.aggregates.trigger(old).await?;
        }
        self.aggregates.trigger(product_id).await?;
        info!(review_id = %review_id, product_id = %product_id, "review resolved");
        Ok(product_id)
    }

    async fn expire_due(&self) -> Result<usize> {
        let due = self.reviews.list_expired(chrono::Utc::now()).await?;
        let mut count = 0;
        for row in &due {
            self.reviews.mark_expired(row.id).await?;
            self.items.revert_to_unmatched(row.supplier_item_id).await?;
            count += 1;
        }
        if count > 0 {
            info!(count, "expired stale review rows");
        }
        Ok(count)
    }
}
