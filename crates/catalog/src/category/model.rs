use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::CatalogError;

/// A node in the category tree (spec §3): unique `(name, parent_id)`, never
/// its own ancestor. `needs_review` flags categories the classifier inferred
/// but has not confirmed; `supplier_id` records the origin supplier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub needs_review: bool,
    pub is_active: bool,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, parent_id: Option<Uuid>, supplier_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            needs_review: true,
            is_active: true,
            supplier_id,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "category name cannot be empty"));
        }
        if self.parent_id == Some(self.id) {
            return Err(CatalogError::validation("parent_id", "a category cannot be its own parent"));
        }
        Ok(())
    }
}
