//! Supplier repository: CRUD and upsert-by-name for the master-sync orchestrator.

use async_trait::async_trait;
use catalog_core::DatabasePool;
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::model::{SourceType, Supplier};
use crate::error::{CatalogError, Result};

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn create(&self, supplier: &Supplier) -> Result<Supplier>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Supplier>>;
    async fn get_by_name(&self, name: &str) -> Result<Option<Supplier>>;
    async fn update(&self, supplier: &Supplier) -> Result<Supplier>;
    async fn list_active(&self) -> Result<Vec<Supplier>>;

    /// Insert a new supplier, or update `source_type`/`meta`/`notes`/`is_active`
    /// on an existing one by name (spec §4.7 master-sync upsert rule). Returns
    /// the stored supplier and whether it was newly created.
    async fn upsert_by_name(
        &self,
        name: &str,
        source_type: SourceType,
        source_url: &str,
        is_active: bool,
        notes: Option<&str>,
    ) -> Result<(Supplier, bool)>;
}

pub struct PostgresSupplierRepository {
    db: DatabasePool,
}

impl PostgresSupplierRepository {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::PgPool {
        &self.db.pool
    }
}

fn row_to_supplier(row: sqlx::postgres::PgRow) -> Supplier {
    Supplier {
        id: row.get("id"),
        name: row.get("name"),
        source_type: row.get("source_type"),
        contact_email: row.get("contact_email"),
        meta: row.get("meta"),
        is_active: row.get("is_active"),
        use_semantic_etl: row.get("use_semantic_etl"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLUMNS: &str =
    "id, name, source_type, contact_email, metadata AS meta, is_active, use_semantic_etl, created_at, updated_at";

#[async_trait]
impl SupplierRepository for PostgresSupplierRepository {
    async fn create(&self, supplier: &Supplier) -> Result<Supplier> {
        let query = format!(
            r#"
            INSERT INTO suppliers (id, name, source_type, contact_email, metadata, is_active, use_semantic_etl, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(supplier.id)
            .bind(&supplier.name)
            .bind(supplier.source_type)
            .bind(&supplier.contact_email)
            .bind(&supplier.meta)
            .bind(supplier.is_active)
            .bind(supplier.use_semantic_etl)
            .bind(supplier.created_at)
            .bind(supplier.updated_at)
            .fetch_one(self.pool())
            .await?;

        Ok(row_to_supplier(row))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Supplier>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM suppliers WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(self.pool()).await?;
        Ok(row.map(row_to_supplier))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Supplier>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM suppliers WHERE name = $1");
        let row = sqlx::query(&query).bind(name).fetch_optional(self.pool()).await?;
        Ok(row.map(row_to_supplier))
    }

    async fn update(&self, supplier: &Supplier) -> Result<Supplier> {
        let query = format!(
            r#"
            UPDATE suppliers
            SET name = $2, source_type = $3, contact_email = $4, metadata = $5,
                is_active = $6, use_semantic_etl = $7, updated_at = $8
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(supplier.id)
            .bind(&supplier.name)
            .bind(supplier.source_type)
            .bind(&supplier.contact_email)
            .bind(&supplier.meta)
            .bind(supplier.is_active)
            .bind(supplier.use_semantic_etl)
            .bind(Utc::now())
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("supplier {} not found", supplier.id)))?;

        Ok(row_to_supplier(row))
    }

    async fn list_active(&self) -> Result<Vec<Supplier>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM suppliers WHERE is_active = true");
        let rows = sqlx::query(&query).fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(row_to_supplier).collect())
    }

    async fn upsert_by_name(
        &self,
        name: &str,
        source_type: SourceType,
        source_url: &str,
        is_active: bool,
        notes: Option<&str>,
    ) -> Result<(Supplier, bool)> {
        match self.get_by_name(name).await? {
            Some(mut existing) => {
                existing.source_type = source_type;
                existing.is_active = is_active;
                if let Some(obj) = existing.meta.as_object_mut() {
                    obj.insert("source_url".to_string(), source_url.into());
                    if let Some(notes) = notes {
                        obj.insert("notes".to_string(), notes.into());
                    }
                }
                let updated = self.update(&existing).await?;
                Ok((updated, false))
            }
            None => {
                let mut supplier = Supplier::new(name, source_type);
                supplier.is_active = is_active;
                if let Some(obj) = supplier.meta.as_object_mut() {
                    obj.insert("source_url".to_string(), source_url.into());
                    if let Some(notes) = notes {
                        obj.insert("notes".to_string(), notes.into());
                    }
                }
                supplier.validate()?;
                let created = self.create(&supplier).await?;
                Ok((created, true))
            }
        }
    }
}
