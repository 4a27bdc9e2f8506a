//! Matching pipeline worker (spec §4.6): per-item state machine driving a
//! claimed batch of `unmatched` supplier items to `matched`, `potential`, or
//! `needs_category`.

use std::sync::Arc;
use tracing::{info, warn};

use super::matcher::{match_against, MatcherConfig};
use super::types::{MatchCandidate as MatcherCandidate, MatchStatusOutcome};
use super::DEFAULT_CANDIDATE_WINDOW;
use crate::aggregation::AggregateTrigger;
use crate::category::CategoryRepository;
use crate::error::Result;
use crate::product::ProductService;
use crate::review::{MatchReviewQueue, ReviewRepository, DEFAULT_REVIEW_TTL_DAYS};
use crate::supplier_item::SupplierItemRepository;

pub struct MatchingWorker {
    pub items: Arc<dyn SupplierItemRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn crate::product::ProductRepository>,
    pub product_service: Arc<dyn ProductService>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub aggregates: Arc<dyn AggregateTrigger>,
    pub config: MatcherConfig,
    pub review_ttl_days: i64,
}

impl MatchingWorker {
    pub fn new(
        items: Arc<dyn SupplierItemRepository>,
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn crate::product::ProductRepository>,
        product_service: Arc<dyn ProductService>,
        reviews: Arc<dyn ReviewRepository>,
        aggregates: Arc<dyn AggregateTrigger>,
    ) -> Self {
        Self {
            items,
            categories,
            products,
            product_service,
            reviews,
            aggregates,
            config: MatcherConfig::default(),
            review_ttl_days: DEFAULT_REVIEW_TTL_DAYS,
        }
    }

    /// Claims and processes one batch (spec §4.6 "Claiming"). Each item's
    /// outcome is isolated: a failure on one item is logged and the item
    /// stays `unmatched` for the next pass, but the batch continues.
    pub async fn run_batch(&self, limit: i64) -> Result<usize> {
        let batch = self.items.claim_unmatched_batch(limit).await?;
        let mut processed = 0;
        for item in batch {
            match self.process_item(&item).await {
                Ok(()) => processed += 1,
                Err(err) => warn!(supplier_item_id = %item.id, error = %err, "matching pass failed for item"),
            }
        }
        Ok(processed)
    }

    async fn process_item(&self, item: &crate::supplier_item::SupplierItem) -> Result<()> {
        let Some(category_id) = item.category_id else {
            self.items.set_needs_category(item.id).await?;
            info!(supplier_item_id = %item.id, "item has no category, needs_category");
            return Ok(());
        };

        let subtree = self.categories.subtree_ids(category_id).await?;
        let candidates = self.products.list_candidates(Some(&subtree), DEFAULT_CANDIDATE_WINDOW).await?;
        let result = match_against(&item.name, &candidates, &self.config);

        match result.status {
            MatchStatusOutcome::Matched => {
                let product_id = result.candidates[0].product_id;
                self.products.activate_if_draft(product_id).await?;
                self.items.link_to_product(item.id, product_id).await?;
                self.aggregates.trigger(product_id).await?;
                info!(supplier_item_id = %item.id, product_id = %product_id, score = result.best_score, "item auto-matched");
            }
            MatchStatusOutcome::Potential => {
                let candidates: Vec<MatcherCandidate> = result.candidates;
                let review = MatchReviewQueue::new(item.id, candidates, self.review_ttl_days);
                self.reviews.create(&review).await?;
                self.items.set_potential(item.id).await?;
                info!(supplier_item_id = %item.id, score = result.best_score, "item queued for review");
            }
            MatchStatusOutcome::NoMatch => {
                let product = self.product_service.create_new(&item.name, Some(category_id)).await?;
                self.items.link_to_product(item.id, product.id).await?;
                self.aggregates.trigger(product.id).await?;
                info!(supplier_item_id = %item.id, product_id = %product.id, "item created new product");
            }
            MatchStatusOutcome::NeedsCategory => unreachable!("category_id already checked above"),
        }

        Ok(())
    }
}
