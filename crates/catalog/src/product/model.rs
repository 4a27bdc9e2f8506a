//! Product data model: the canonical unified catalog entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::types::CurrencyCode;

/// Product lifecycle status (spec §3): progresses `draft -> active` on first
/// link, never regresses automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Active,
    Archived,
}

impl Default for ProductStatus {
    fn default() -> Self {
        Self::Draft
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub internal_sku: String,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub status: ProductStatus,
    pub min_price: Option<Decimal>,
    pub availability: bool,
    pub retail_price: Option<Decimal>,
    pub wholesale_price: Option<Decimal>,
    pub currency_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(internal_sku: impl Into<String>, name: impl Into<String>, category_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            internal_sku: internal_sku.into(),
            name: name.into(),
            category_id,
            status: ProductStatus::Draft,
            min_price: None,
            availability: false,
            retail_price: None,
            wholesale_price: None,
            currency_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flips `draft -> active` on first successful link (spec §3 lifecycle
    /// rule); a no-op once the product has progressed past `draft`.
    pub fn activate(&mut self) {
        if self.status == ProductStatus::Draft {
            self.status = ProductStatus::Active;
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.internal_sku.trim().is_empty() {
            return Err(CatalogError::validation("internal_sku", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "must not be empty"));
        }
        if let Some(code) = &self.currency_code {
            CurrencyCode::parse(code).map_err(|e| CatalogError::validation("currency_code", e))?;
        }
        for (field, price) in [
            ("min_price", self.min_price),
            ("retail_price", self.retail_price),
            ("wholesale_price", self.wholesale_price),
        ] {
            if price.is_some_and(|p| p < Decimal::ZERO) {
                return Err(CatalogError::validation(field, "must be >= 0"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_only_moves_forward_from_draft() {
        let mut p = Product::new("SKU-1", "Widget", None);
        assert_eq!(p.status, ProductStatus::Draft);
        p.activate();
        assert_eq!(p.status, ProductStatus::Active);
        p.status = ProductStatus::Archived;
        p.activate();
        assert_eq!(p.status, ProductStatus::Archived);
    }

    #[test]
    fn rejects_negative_prices() {
        let mut p = Product::new("SKU-1", "Widget", None);
        p.min_price = Some(Decimal::new(-100, 2));
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_malformed_currency_code() {
        let mut p = Product::new("SKU-1", "Widget", None);
        p.currency_code = Some("dollars".to_string());
        assert!(p.validate().is_err());
    }
}
