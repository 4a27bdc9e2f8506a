//! Product repository: CRUD plus the aggregate-bearing queries the matching
//! and aggregation engines need.

use async_trait::async_trait;
use catalog_core::DatabasePool;
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

use super::model::{Product, ProductStatus};
use crate::error::{CatalogError, Result};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    /// Candidate products for the matcher, optionally restricted to a
    /// category subtree (spec §4.3 category blocking).
    async fn list_candidates(&self, category_ids: Option<&[Uuid]>, limit: i64) -> Result<Vec<(Uuid, String)>>;

    async fn set_status(&self, id: Uuid, status: ProductStatus) -> Result<()>;

    /// Flips `draft -> active` (spec §4.6 step 4), conditional on the current
    /// status so an `archived` product is never silently reactivated by a
    /// later auto-match.
    async fn activate_if_draft(&self, id: Uuid) -> Result<()>;

    async fn set_aggregates(&self, id: Uuid, min_price: Option<Decimal>, availability: bool) -> Result<()>;
}

pub struct PostgresProductRepository {
    db: DatabasePool,
}

impl PostgresProductRepository {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::PgPool {
        &self.db.pool
    }
}

const SELECT_COLUMNS: &str =
    "id, internal_sku, name, category_id, status, min_price, availability, retail_price, wholesale_price, currency_code, created_at, updated_at";

fn row_to_product(row: sqlx::postgres::PgRow) -> Product {
    Product {
        id: row.get("id"),
        internal_sku: row.get("internal_sku"),
        name: row.get("name"),
        category_id: row.get("category_id"),
        status: row.get("status"),
        min_price: row.get("min_price"),
        availability: row.get("availability"),
        retail_price: row.get("retail_price"),
        wholesale_price: row.get("wholesale_price"),
        currency_code: row.get("currency_code"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: &Product) -> Result<Product> {
        let query = format!(
            r#"
            INSERT INTO products (id, internal_sku, name, category_id, status, min_price, availability, retail_price, wholesale_price, currency_code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(product.id)
            .bind(&product.internal_sku)
            .bind(&product.name)
            .bind(product.category_id)
            .bind(product.status)
            .bind(product.min_price)
            .bind(product.availability)
            .bind(product.retail_price)
            .bind(product.wholesale_price)
            .bind(&product.currency_code)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(self.pool())
            .await?;

        Ok(row_to_product(row))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(self.pool()).await?;
        Ok(row.map(row_to_product))
    }

    async fn list_candidates(&self, category_ids: Option<&[Uuid]>, limit: i64) -> Result<Vec<(Uuid, String)>> {
        let rows = match category_ids {
            Some(ids) => {
                sqlx::query("SELECT id, name FROM products WHERE category_id = ANY($1) LIMIT $2")
                    .bind(ids)
                    .bind(limit)
                    .fetch_all(self.pool())
                    .await?
            }
            None => {
                sqlx::query("SELECT id, name FROM products LIMIT $1")
                    .bind(limit)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        Ok(rows.into_iter().map(|r| (r.get("id"), r.get("name"))).collect())
    }

    async fn set_status(&self, id: Uuid, status: ProductStatus) -> Result<()> {
        let result = sqlx::query("UPDATE products SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("product {id} not found")));
        }
        Ok(())
    }

    async fn activate_if_draft(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE products SET status = 'active', updated_at = now() WHERE id = $1 AND status = 'draft'")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            // Either the product doesn't exist, or it's past `draft` already — the
            // latter is the common, expected case and not an error.
            self.get_by_id(id).await?.ok_or_else(|| CatalogError::not_found(format!("product {id} not found")))?;
        }
        Ok(())
    }

    async fn set_aggregates(&self, id: Uuid, min_price: Option<Decimal>, availability: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products SET min_price = $2, availability = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(min_price)
        .bind(availability)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!("product {id} not found")));
        }
        Ok(())
    }
}
