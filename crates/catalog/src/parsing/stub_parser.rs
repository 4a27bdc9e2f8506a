//! Fixed-output parser used for integration tests and local development
//! without a real supplier source (spec §4.2 "stub" parser type).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

use super::item::ParsedSupplierItem;
use super::registry::ParserInterface;
use crate::error::Result;

pub struct StubParser;

fn fixed_items() -> Vec<ParsedSupplierItem> {
    vec![
        ParsedSupplierItem {
            supplier_sku: "STUB-001".to_string(),
            name: "Test Product 1".to_string(),
            price: Decimal::new(1099, 2),
            characteristics: HashMap::from([
                ("color".to_string(), json!("red")),
                ("size".to_string(), json!("M")),
            ]),
            in_stock: None,
        },
        ParsedSupplierItem {
            supplier_sku: "STUB-002".to_string(),
            name: "Test Product 2".to_string(),
            price: Decimal::new(2550, 2),
            characteristics: HashMap::from([
                ("color".to_string(), json!("blue")),
                ("size".to_string(), json!("L")),
            ]),
            in_stock: None,
        },
        ParsedSupplierItem {
            supplier_sku: "STUB-003".to_string(),
            name: "Test Product 3".to_string(),
            price: Decimal::new(500, 2),
            characteristics: HashMap::from([("color".to_string(), json!("green"))]),
            in_stock: None,
        },
    ]
}

#[async_trait]
impl ParserInterface for StubParser {
    async fn parse(&self, _config: &JsonValue) -> Result<Vec<ParsedSupplierItem>> {
        Ok(fixed_items())
    }

    fn validate_config(&self, config: &JsonValue) -> Result<()> {
        if !config.is_object() && !config.is_null() {
            return Err(crate::error::CatalogError::validation(
                "config",
                "stub parser config must be a JSON object",
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_exactly_three_fixed_items() {
        let items = StubParser.parse(&json!({})).await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].supplier_sku, "STUB-001");
        assert_eq!(items[2].characteristics.len(), 1);
    }

    #[test]
    fn accepts_null_or_empty_config() {
        assert!(StubParser.validate_config(&JsonValue::Null).is_ok());
        assert!(StubParser.validate_config(&json!({})).is_ok());
    }
}
