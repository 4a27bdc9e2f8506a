use async_trait::async_trait;
use catalog_core::DatabasePool;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::Row;
use uuid::Uuid;

use super::model::SupplierItem;
use crate::error::{CatalogError, Result};

const SELECT_COLUMNS: &str = "id, supplier_id, supplier_sku, name, current_price, characteristics, \
    product_id, match_status, category_id, price_opt, price_rrc, in_stock, last_ingested_at, created_at";

fn row_to_item(row: sqlx::postgres::PgRow) -> SupplierItem {
    SupplierItem {
        id: row.get("id"),
        supplier_id: row.get("supplier_id"),
        supplier_sku: row.get("supplier_sku"),
        name: row.get("name"),
        current_price: row.get("current_price"),
        characteristics: row.get("characteristics"),
        product_id: row.get("product_id"),
        match_status: row.get("match_status"),
        category_id: row.get("category_id"),
        price_opt: row.get("price_opt"),
        price_rrc: row.get("price_rrc"),
        in_stock: row.get("in_stock"),
        last_ingested_at: row.get("last_ingested_at"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
pub trait SupplierItemRepository: Send + Sync {
    /// Upserts keyed by `(supplier_id, supplier_sku)` (spec §3); returns the
    /// stored row and whether it was newly inserted. An unchanged upsert
    /// still bumps `last_ingested_at` (spec §8 idempotence).
    async fn upsert(
        &self,
        supplier_id: Uuid,
        supplier_sku: &str,
        name: &str,
        price: Decimal,
        characteristics: JsonValue,
        in_stock: Option<bool>,
    ) -> Result<(SupplierItem, bool)>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<SupplierItem>>;

    /// Claims up to `limit` unmatched rows for one worker pass using
    /// `SELECT ... FOR UPDATE SKIP LOCKED` (spec §4.6, §9) so concurrent
    /// workers never observe the same row.
    async fn claim_unmatched_batch(&self, limit: i64) -> Result<Vec<SupplierItem>>;

    async fn set_needs_category(&self, id: Uuid) -> Result<()>;

    async fn link_to_product(&self, id: Uuid, product_id: Uuid) -> Result<()>;

    async fn set_potential(&self, id: Uuid) -> Result<()>;

    async fn revert_to_unmatched(&self, id: Uuid) -> Result<()>;

    /// Candidate products for the matcher: active-status products, optionally
    /// restricted to a category subtree (spec §4.3).
    async fn list_items_for_product(&self, product_id: Uuid, active_suppliers_only: bool) -> Result<Vec<SupplierItem>>;

    /// Merges extracted features into `characteristics` (spec §4.4
    /// "merge results into a single characteristics map"); a Postgres `||`
    /// merge so re-running on the same input is idempotent.
    async fn merge_characteristics(&self, id: Uuid, features: JsonValue) -> Result<()>;
}

pub struct PostgresSupplierItemRepository {
    db: DatabasePool,
}

impl PostgresSupplierItemRepository {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::PgPool {
        &self.db.pool
    }
}

#[async_trait]
impl SupplierItemRepository for PostgresSupplierItemRepository {
    async fn upsert(
        &self,
        supplier_id: Uuid,
        supplier_sku: &str,
        name: &str,
        price: Decimal,
        characteristics: JsonValue,
        in_stock: Option<bool>,
    ) -> Result<(SupplierItem, bool)> {
        let query = format!(
            r#"
            INSERT INTO supplier_items
                (id, supplier_id, supplier_sku, name, current_price, characteristics, in_stock, match_status, last_ingested_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'unmatched', $8, $8)
            ON CONFLICT (supplier_id, supplier_sku) DO UPDATE SET
                name = EXCLUDED.name,
                current_price = EXCLUDED.current_price,
                characteristics = supplier_items.characteristics || EXCLUDED.characteristics,
                in_stock = COALESCE(EXCLUDED.in_stock, supplier_items.in_stock),
                last_ingested_at = EXCLUDED.last_ingested_at
            RETURNING {SELECT_COLUMNS}, (xmax = 0) AS inserted
            "#
        );
        let now = Utc::now();
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(supplier_id)
            .bind(supplier_sku)
            .bind(name)
            .bind(price)
            .bind(characteristics)
            .bind(in_stock)
            .bind(now)
            .fetch_one(self.pool())
            .await?;

        let inserted: bool = row.get("inserted");
        Ok((row_to_item(row), inserted))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<SupplierItem>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM supplier_items WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(self.pool()).await?;
        Ok(row.map(row_to_item))
    }

    async fn claim_unmatched_batch(&self, limit: i64) -> Result<Vec<SupplierItem>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM supplier_items \
             WHERE product_id IS NULL AND match_status = 'unmatched' \
             ORDER BY created_at ASC \
             FOR UPDATE SKIP LOCKED \
             LIMIT $1"
        );
        let rows = sqlx::query(&query).bind(limit).fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn set_needs_category(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE supplier_items SET match_status = 'needs_category' WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("supplier item {id}")));
        }
        Ok(())
    }

    async fn link_to_product(&self, id: Uuid, product_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE supplier_items SET product_id = $2, match_status = 'matched' WHERE id = $1",
        )
        .bind(id)
        .bind(product_id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("supplier item {id}")));
        }
        Ok(())
    }

    async fn set_potential(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE supplier_items SET match_status = 'potential' WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("supplier item {id}")));
        }
        Ok(())
    }

    async fn revert_to_unmatched(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE supplier_items SET match_status = 'unmatched', product_id = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("supplier item {id}")));
        }
        Ok(())
    }

    async fn list_items_for_product(&self, product_id: Uuid, active_suppliers_only: bool) -> Result<Vec<SupplierItem>> {
        let query = if active_suppliers_only {
            format!(
                "SELECT {SELECT_COLUMNS} FROM supplier_items si \
                 JOIN suppliers s ON s.id = si.supplier_id \
                 WHERE si.product_id = $1 AND s.is_active = true"
            )
        } else {
            format!("SELECT {SELECT_COLUMNS} FROM supplier_items WHERE product_id = $1")
        };
        let rows = sqlx::query(&query).bind(product_id).fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn merge_characteristics(&self, id: Uuid, features: JsonValue) -> Result<()> {
        let result = sqlx::query("UPDATE supplier_items SET characteristics = characteristics || $2 WHERE id = $1")
            .bind(id)
            .bind(features)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("supplier item {id}")));
        }
        Ok(())
    }
}

