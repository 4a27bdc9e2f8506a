use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::error::CatalogError;

/// The canonical in-flight row emitted by any parser, before it is
/// upserted into `supplier_items` (spec §2 item 1, §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSupplierItem {
    pub supplier_sku: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub characteristics: HashMap<String, JsonValue>,
    /// Explicit stock signal, when the source provides one (spec §3 "Stock
    /// signal"); `None` is treated as `false` by the aggregation engine.
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl ParsedSupplierItem {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.supplier_sku.trim().is_empty() {
            return Err(CatalogError::validation("supplier_sku", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "must not be empty"));
        }
        if self.price < Decimal::ZERO {
            return Err(CatalogError::validation("price", "must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, name: &str, price: i64) -> ParsedSupplierItem {
        ParsedSupplierItem {
            supplier_sku: sku.to_string(),
            name: name.to_string(),
            price: Decimal::new(price, 2),
            characteristics: HashMap::new(),
            in_stock: None,
        }
    }

    #[test]
    fn zero_price_is_valid() {
        assert!(item("A1", "Widget", 0).validate().is_ok());
    }

    #[test]
    fn negative_price_rejected() {
        assert!(item("A1", "Widget", -100).validate().is_err());
    }

    #[test]
    fn empty_sku_rejected() {
        assert!(item("", "Widget", 100).validate().is_err());
    }
}
