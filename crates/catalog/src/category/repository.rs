use async_trait::async_trait;
use catalog_core::DatabasePool;
use sqlx::Row;
use uuid::Uuid;

use super::model::Category;
use crate::error::{CatalogError, Result};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Category>>;
    async fn get_by_name_and_parent(&self, name: &str, parent_id: Option<Uuid>) -> Result<Option<Category>>;

    /// All descendant ids of `root` (inclusive), used for category-blocked
    /// matcher candidate queries (spec §4.3).
    async fn subtree_ids(&self, root: Uuid) -> Result<Vec<Uuid>>;

    /// Ancestor chain of `id`, nearest first, used to reject cycle-forming
    /// inserts (spec §9: "acyclicity must be enforced on insertion").
    async fn ancestors(&self, id: Uuid) -> Result<Vec<Uuid>>;
}

pub struct PostgresCategoryRepository {
    db: DatabasePool,
}

impl PostgresCategoryRepository {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::PgPool {
        &self.db.pool
    }

    /// Walks from `parent_id` up to the root, failing if `candidate_id` is
    /// encountered — the cycle-prevention check required because Postgres
    /// cannot enforce acyclicity on a self-referential FK by itself.
    pub async fn would_create_cycle(&self, candidate_id: Uuid, parent_id: Option<Uuid>) -> Result<bool> {
        let Some(mut current) = parent_id else {
            return Ok(false);
        };
        loop {
            if current == candidate_id {
                return Ok(true);
            }
            match self.get_by_id(current).await? {
                Some(cat) => match cat.parent_id {
                    Some(next) => current = next,
                    None => return Ok(false),
                },
                None => return Ok(false),
            }
        }
    }

    fn row_to_category(row: sqlx::postgres::PgRow) -> Category {
        Category {
            id: row.get("id"),
            name: row.get("name"),
            parent_id: row.get("parent_id"),
            needs_review: row.get("needs_review"),
            is_active: row.get("is_active"),
            supplier_id: row.get("supplier_id"),
            created_at: row.get("created_at"),
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, parent_id, needs_review, is_active, supplier_id, created_at";

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        category.validate()?;
        if self.would_create_cycle(category.id, category.parent_id).await? {
            return Err(CatalogError::validation(
                "parent_id",
                "assigning this parent would create a cycle in the category tree",
            ));
        }

        let query = format!(
            r#"
            INSERT INTO categories (id, name, parent_id, needs_review, is_active, supplier_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(category.id)
            .bind(&category.name)
            .bind(category.parent_id)
            .bind(category.needs_review)
            .bind(category.is_active)
            .bind(category.supplier_id)
            .bind(category.created_at)
            .fetch_one(self.pool())
            .await?;

        Ok(Self::row_to_category(row))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(self.pool()).await?;
        Ok(row.map(Self::row_to_category))
    }

    async fn get_by_name_and_parent(&self, name: &str, parent_id: Option<Uuid>) -> Result<Option<Category>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM categories WHERE name = $1 AND parent_id IS NOT DISTINCT FROM $2"
        );
        let row = sqlx::query(&query)
            .bind(name)
            .bind(parent_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(Self::row_to_category))
    }

    async fn subtree_ids(&self, root: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            r#"
            WITH RECURSIVE subtree AS (
                SELECT id FROM categories WHERE id = $1
                UNION ALL
                SELECT c.id FROM categories c JOIN subtree s ON c.parent_id = s.id
            )
            SELECT id FROM subtree
            "#,
        )
        .bind(root)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(|r| r.get("id")).collect())
    }

    async fn ancestors(&self, id: Uuid) -> Result<Vec<Uuid>> {
        let mut chain = Vec::new();
        let Some(mut current) = self.get_by_id(id).await?.and_then(|c| c.parent_id) else {
            return Ok(chain);
        };
        loop {
            chain.push(current);
            match self.get_by_id(current).await?.and_then(|c| c.parent_id) {
                Some(next) if !chain.contains(&next) => current = next,
                _ => break,
            }
        }
        Ok(chain)
    }
}
