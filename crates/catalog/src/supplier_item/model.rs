use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::CatalogError;

/// Per-item label driving the matching pipeline state machine (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Unmatched,
    Potential,
    Matched,
    NeedsCategory,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmatched => "unmatched",
            Self::Potential => "potential",
            Self::Matched => "matched",
            Self::NeedsCategory => "needs_category",
        }
    }
}

/// Persisted raw row from a supplier (spec §3), uniquely identified by
/// `(supplier_id, supplier_sku)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SupplierItem {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_sku: String,
    pub name: String,
    pub current_price: Decimal,
    pub characteristics: JsonValue,
    pub product_id: Option<Uuid>,
    pub match_status: MatchStatus,
    pub category_id: Option<Uuid>,
    pub price_opt: Option<Decimal>,
    pub price_rrc: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub last_ingested_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SupplierItem {
    pub fn new(supplier_id: Uuid, supplier_sku: impl Into<String>, name: impl Into<String>, current_price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            supplier_id,
            supplier_sku: supplier_sku.into(),
            name: name.into(),
            current_price,
            characteristics: JsonValue::Object(Default::default()),
            product_id: None,
            match_status: MatchStatus::Unmatched,
            category_id: None,
            price_opt: None,
            price_rrc: None,
            in_stock: None,
            last_ingested_at: now,
            created_at: now,
        }
    }

    /// Invariant (spec §3/§8): `matched ⇔ product_id ≠ null`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.supplier_sku.trim().is_empty() {
            return Err(CatalogError::validation("supplier_sku", "must not be empty"));
        }
        if self.current_price < Decimal::ZERO {
            return Err(CatalogError::validation("current_price", "must be >= 0"));
        }
        if let Some(p) = self.price_opt {
            if p < Decimal::ZERO {
                return Err(CatalogError::validation("price_opt", "must be >= 0"));
            }
        }
        if let Some(p) = self.price_rrc {
            if p < Decimal::ZERO {
                return Err(CatalogError::validation("price_rrc", "must be >= 0"));
            }
        }
        let matched = self.match_status == MatchStatus::Matched;
        if matched != self.product_id.is_some() {
            return Err(CatalogError::validation(
                "match_status",
                "matched status must coincide with a non-null product_id",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_unmatched_with_no_product() {
        let item = SupplierItem::new(Uuid::new_v4(), "SKU1", "Widget", Decimal::new(100, 2));
        assert_eq!(item.match_status, MatchStatus::Unmatched);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn matched_without_product_id_is_invalid() {
        let mut item = SupplierItem::new(Uuid::new_v4(), "SKU1", "Widget", Decimal::new(100, 2));
        item.match_status = MatchStatus::Matched;
        assert!(item.validate().is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let item = SupplierItem::new(Uuid::new_v4(), "SKU1", "Widget", Decimal::new(-100, 2));
        assert!(item.validate().is_err());
    }
}
