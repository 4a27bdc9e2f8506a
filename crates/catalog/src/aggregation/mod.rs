//! Aggregation engine (spec §4.5): recomputes `Product.min_price` and
//! `Product.availability` from currently linked supplier items.

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::product::ProductRepository;
use crate::supplier_item::SupplierItemRepository;
use crate::error::Result;

/// Enqueues a `recalc_aggregates` task for a product (spec §4.5 "Trigger
/// policy"). Kept as a trait so the matching/review layers never depend
/// directly on the queue backend; the worker binds the real implementation.
#[async_trait]
pub trait AggregateTrigger: Send + Sync {
    async fn trigger(&self, product_id: Uuid) -> Result<()>;
}

/// `recompute(product_id)` (spec §4.5): `min_price` is the smallest
/// `current_price` over items linked to an active supplier, or `null` when
/// none are linked; `availability` is true iff any linked active item
/// signals stock (`in_stock = Some(true)`; `None` counts as no signal, spec
/// §3 "Stock signal").
pub async fn recompute(
    product_id: Uuid,
    items: &dyn SupplierItemRepository,
    products: &dyn ProductRepository,
) -> Result<()> {
    let linked = items.list_items_for_product(product_id, true).await?;

    let min_price = linked.iter().map(|i| i.current_price).min();
    let availability = linked.iter().any(|i| i.in_stock == Some(true));

    products.set_aggregates(product_id, min_price, availability).await?;
    info!(product_id = %product_id, ?min_price, availability, "recomputed product aggregates");
    Ok(())
}

/// Batched form (spec §4.5): each product is processed independently; a
/// failure on one is logged but never aborts the others.
pub async fn recompute_batch(
    product_ids: &[Uuid],
    items: &dyn SupplierItemRepository,
    products: &dyn ProductRepository,
) {
    for &product_id in product_ids {
        if let Err(err) = recompute(product_id, items, products).await {
            error!(product_id = %product_id, error = %err, "aggregate recompute failed");
        }
    }
}
